//! Print or check BLAKE2bp digests.
//!
//! Usage:
//!   b2psum [FILE]...
//!   b2psum --length 32 --parallel big.iso
//!   b2psum --check <HEX> FILE

use std::{
  fs::File,
  io::{self, Read},
  num::NonZeroUsize,
  path::{Path, PathBuf},
  process::ExitCode,
  sync::atomic::{AtomicUsize, Ordering},
  thread,
};

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use treehash::{
  Hash,
  crypto::{
    Blake2bp,
    blake2bp::{DEGREE, parallel},
  },
};

const READ_BUF_LEN: usize = 64 * 1024;

#[derive(Parser, Debug)]
#[command(name = "b2psum", version, about = "Print or check BLAKE2bp (4-leaf tree) digests")]
struct Cli {
  /// Digest length in bytes.
  #[arg(short, long, default_value_t = 64, value_parser = clap::value_parser!(u8).range(1..=64))]
  length: u8,

  /// Hash the four leaf lanes on separate threads. Reads each input fully into memory.
  #[arg(short, long)]
  parallel: bool,

  /// Expected digest in hex; exits non-zero if any input does not match.
  #[arg(short, long, value_name = "HEX")]
  check: Option<String>,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace).
  #[arg(short, long, action = ArgAction::Count)]
  verbose: u8,

  /// Files to hash. `-` or no files reads standard input.
  files: Vec<PathBuf>,
}

fn init_tracing(verbose: u8) {
  let default = match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();
}

/// Decode an expected digest; case-insensitive, optional `0x` prefix.
fn decode_hex(s: &str) -> Result<Vec<u8>> {
  let s = s.trim();
  let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
  if digits.len() % 2 != 0 {
    bail!("hex digest has odd length {}", digits.len());
  }

  let nibble = |c: u8| {
    char::from(c)
      .to_digit(16)
      .with_context(|| format!("invalid hex digit {:?} in digest", char::from(c)))
  };
  digits
    .as_bytes()
    .chunks_exact(2)
    .map(|pair| match *pair {
      [hi, lo] => Ok(((nibble(hi)? << 4) | nibble(lo)?) as u8),
      _ => bail!("hex digest has odd length {}", digits.len()),
    })
    .collect()
}

fn hash_reader(mut reader: impl Read, length: usize, threaded: bool) -> Result<Hash> {
  if threaded {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).context("read input")?;
    debug!(bytes = data.len(), "hashing with threaded leaves");
    return Ok(parallel::digest(length, &data)?);
  }

  let mut ctx = Blake2bp::new(length)?;
  let mut buf = vec![0u8; READ_BUF_LEN];
  loop {
    let n = match reader.read(&mut buf) {
      Ok(0) => break,
      Ok(n) => n,
      Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
      Err(err) => return Err(err).context("read input"),
    };
    ctx.update(buf.get(..n).unwrap_or_default())?;
  }
  Ok(ctx.finalize()?)
}

fn hash_path(path: &Path, length: usize, threaded: bool) -> Result<Hash> {
  if path.as_os_str() == "-" {
    return hash_reader(io::stdin().lock(), length, threaded).context("hash standard input");
  }
  let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
  hash_reader(file, length, threaded).with_context(|| format!("hash {}", path.display()))
}

/// Hash `files` on a bounded pool of workers; results come back in input order.
///
/// Each worker claims the next unhashed index until the list is exhausted, so
/// at most `workers` inputs are in flight (and, with `threaded`, in memory).
fn hash_all(files: &[PathBuf], length: usize, threaded: bool) -> Result<Vec<Result<Hash>>> {
  let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
  let per_input = if threaded { DEGREE } else { 1 };
  let workers = (cores / per_input).clamp(1, files.len().max(1));
  debug!(workers, inputs = files.len(), "hashing inputs");

  let next = AtomicUsize::new(0);
  thread::scope(|s| -> Result<Vec<Result<Hash>>> {
    let mut handles = Vec::with_capacity(workers);
    for id in 0..workers {
      let handle = thread::Builder::new()
        .name(format!("b2psum-{id}"))
        .spawn_scoped(s, || {
          let mut done = Vec::new();
          loop {
            let i = next.fetch_add(1, Ordering::Relaxed);
            let Some(path) = files.get(i) else { break };
            done.push((i, hash_path(path, length, threaded)));
          }
          done
        })
        .context("spawn hashing worker")?;
      handles.push(handle);
    }

    let mut slots: Vec<Option<Result<Hash>>> = files.iter().map(|_| None).collect();
    for handle in handles {
      let done = handle.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload));
      for (i, result) in done {
        if let Some(slot) = slots.get_mut(i) {
          *slot = Some(result);
        }
      }
    }
    Ok(
      slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(anyhow!("input was not hashed"))))
        .collect(),
    )
  })
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let length = usize::from(cli.length);
  let expected = cli.check.as_deref().map(decode_hex).transpose()?;
  if let Some(expected) = &expected
    && expected.len() != length
  {
    bail!("expected digest is {} bytes, but --length is {length}", expected.len());
  }

  let files = if cli.files.is_empty() {
    vec![PathBuf::from("-")]
  } else {
    cli.files
  };

  let results = hash_all(&files, length, cli.parallel)?;

  let mut failed = false;
  for (path, result) in files.iter().zip(results) {
    let hash = match result {
      Ok(hash) => hash,
      Err(err) => {
        eprintln!("b2psum: {err:#}");
        failed = true;
        continue;
      }
    };
    info!(path = %path.display(), length, "digest computed");

    match &expected {
      Some(expected) if hash == *expected.as_slice() => println!("{}: OK", path.display()),
      Some(_) => {
        warn!(path = %path.display(), "digest mismatch");
        println!("{}: FAILED", path.display());
        failed = true;
      }
      None => println!("{hash}  {}", path.display()),
    }
  }

  Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
