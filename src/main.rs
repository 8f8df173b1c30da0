//! Interactive shell driving a mounted filesystem, in the style of the `fdisk` command's own
//! prompt loop: a small set of single-word commands read from stdin until EOF or `quit`.

use f16fs::{Error, FileType, Fs, Whence};
use std::env;
use std::fmt;
use std::io::{self, Write};
use std::process::exit;

/// Writes an error to stderr, then exits. Mirrors the convention used for fatal startup
/// failures; per-command failures during the loop are reported the same way but do not exit.
fn fatal<M: fmt::Display>(bin: &str, msg: M) -> ! {
    eprintln!("{bin}: error: {msg}");
    exit(1);
}

fn print_usage(bin: &str) {
    eprintln!("Usage:");
    eprintln!(" {bin} --format <path>");
    eprintln!(" {bin} <path>");
}

/// Reads one line of input, returning `None` on EOF.
fn prompt(msg: &str) -> Option<String> {
    print!("{msg}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    let n = io::stdin().read_line(&mut line).ok()?;
    if n == 0 {
        return None;
    }
    Some(line.trim_end_matches(['\n', '\r']).to_string())
}

fn describe(e: Error) -> String {
    format!("error: {e}")
}

fn handle_cmd(cmd: &str, fs: &mut Fs, open_fds: &mut Vec<usize>) -> bool {
    let words: Vec<&str> = cmd.split_whitespace().collect();
    match words.as_slice() {
        [] => {}
        ["quit"] => return false,
        ["mkfile", path] => match fs.create(path, FileType::Regular) {
            Ok(idx) => println!("created inode {idx}"),
            Err(e) => eprintln!("mkfile {path}: {}", describe(e)),
        },
        ["mkdir", path] => match fs.create(path, FileType::Directory) {
            Ok(idx) => println!("created inode {idx}"),
            Err(e) => eprintln!("mkdir {path}: {}", describe(e)),
        },
        ["open", path] => match fs.open(path) {
            Ok(fd) => {
                open_fds.push(fd);
                println!("fd {fd}");
            }
            Err(e) => eprintln!("open {path}: {}", describe(e)),
        },
        ["close", fd] => match fd.parse::<usize>() {
            Ok(fd) => match fs.close(fd) {
                Ok(()) => open_fds.retain(|&f| f != fd),
                Err(e) => eprintln!("close {fd}: {}", describe(e)),
            },
            Err(_) => eprintln!("close: `{fd}` is not a descriptor number"),
        },
        ["seek", fd, offset] => match (fd.parse::<usize>(), offset.parse::<i64>()) {
            (Ok(fd), Ok(offset)) => match fs.seek(fd, offset, Whence::Set) {
                Ok(new_off) => println!("offset {new_off}"),
                Err(e) => eprintln!("seek {fd}: {}", describe(e)),
            },
            _ => eprintln!("seek: expected <fd> <offset>"),
        },
        ["read", fd, count] => match (fd.parse::<usize>(), count.parse::<usize>()) {
            (Ok(fd), Ok(count)) => {
                let mut buf = vec![0u8; count];
                match fs.read(fd, &mut buf) {
                    Ok(n) => println!("{:?}", String::from_utf8_lossy(&buf[..n])),
                    Err(e) => eprintln!("read {fd}: {}", describe(e)),
                }
            }
            _ => eprintln!("read: expected <fd> <count>"),
        },
        ["write", fd, data @ ..] if !data.is_empty() => match fd.parse::<usize>() {
            Ok(fd) => {
                let payload = data.join(" ");
                match fs.write(fd, payload.as_bytes()) {
                    Ok(n) => println!("wrote {n} bytes"),
                    Err(e) => eprintln!("write {fd}: {}", describe(e)),
                }
            }
            Err(_) => eprintln!("write: `{fd}` is not a descriptor number"),
        },
        ["rm", path] => match fs.remove(path) {
            Ok(()) => {}
            Err(e) => eprintln!("rm {path}: {}", describe(e)),
        },
        ["mv", src, dst] => match fs.rename(src, dst) {
            Ok(()) => {}
            Err(e) => eprintln!("mv {src} {dst}: {}", describe(e)),
        },
        ["ls", path] => match fs.list(path) {
            Ok(entries) => {
                for (name, kind, inode) in entries {
                    let tag = match kind {
                        FileType::Directory => "d",
                        FileType::Regular => "-",
                    };
                    println!("{tag} {inode:>3} {name}");
                }
            }
            Err(e) => eprintln!("ls {path}: {}", describe(e)),
        },
        _ => eprintln!("{cmd}: unknown command"),
    }
    true
}

fn main() {
    let bin = "f16fs-shell";
    let mut args = env::args().skip(1);
    let Some(first) = args.next() else {
        print_usage(bin);
        exit(1);
    };

    let mut fs = if first == "--format" {
        let Some(path) = args.next() else {
            print_usage(bin);
            exit(1);
        };
        Fs::format(&path).unwrap_or_else(|e| fatal(bin, format_args!("{}: {e}", path)))
    } else {
        Fs::mount(&first).unwrap_or_else(|e| fatal(bin, format_args!("{}: {e}", first)))
    };

    let mut open_fds = Vec::new();
    while let Some(cmd) = prompt("f16fs> ") {
        if !handle_cmd(&cmd, &mut fs, &mut open_fds) {
            break;
        }
    }
    for fd in open_fds {
        let _ = fs.close(fd);
    }
    if let Err(e) = fs.unmount() {
        fatal(bin, format_args!("unmount failed: {e}"));
    }
}
