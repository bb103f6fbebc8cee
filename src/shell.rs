use crate::{AuditLog, Cursor, Node, Vfs};
use anyhow::Result;
use std::env;
use std::fmt::Display;
use std::io::Write;
use tracing::{instrument, warn};

const BLUE: &str = "\x1b[94m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Line-oriented command dispatcher sitting on top of an (optional) `Vfs`.
#[derive(Debug)]
pub struct Shell<W> {
    vfs: Option<Vfs>,
    cursor: Cursor,
    user: String,
    audit: Option<AuditLog>,
    out: W,
    failed: bool,
}

impl<W: Write> Shell<W> {
    pub fn new(vfs: Option<Vfs>, user: String, audit: Option<AuditLog>, out: W) -> Self {
        Self {
            vfs,
            cursor: Default::default(),
            user,
            audit,
            out,
            failed: false,
        }
    }

    pub fn prompt(&self) -> String {
        if self.vfs.is_some() {
            format!("{}@vfs-terminal:{}$ ", self.user, self.cwd())
        } else {
            format!("{}@terminal:~$ ", self.user)
        }
    }

    /// Whether the most recently executed line failed.
    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn cwd(&self) -> &str {
        self.cursor.get()
    }

    pub fn vfs(&self) -> Option<&Vfs> {
        self.vfs.as_ref()
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    pub fn print(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.out, "{}", line)?;

        Ok(())
    }

    #[instrument(skip(self))]
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        self.failed = false;

        let line = line.trim();

        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let (verb, args) = line
            .split_once(char::is_whitespace)
            .map(|(verb, args)| (verb, args.trim()))
            .unwrap_or((line, ""));

        let flow = if self.vfs.is_some() {
            self.dispatch(verb, args)?
        } else {
            self.dispatch_plain(verb, args)?
        };

        if let Some(audit) = &mut self.audit {
            if let Err(err) = audit.record(&self.user, line, !self.failed) {
                warn!("couldn't record command: {:?}", err);
            }
        }

        Ok(flow)
    }

    fn dispatch(&mut self, verb: &str, args: &str) -> Result<Flow> {
        match verb {
            "exit" => return Ok(Flow::Exit),
            "ls" => self.ls(args)?,
            "cd" => self.cd(args)?,
            "pwd" => {
                let cwd = self.cursor.get().to_owned();
                self.print(cwd)?;
            }
            "cat" => self.cat(args)?,
            "rm" => self.rm(args)?,
            "chmod" => self.chmod(args)?,
            "vfs-info" => self.vfs_info()?,
            _ => self.not_found(verb, args)?,
        }

        Ok(Flow::Continue)
    }

    fn dispatch_plain(&mut self, verb: &str, args: &str) -> Result<Flow> {
        match verb {
            "exit" => return Ok(Flow::Exit),

            _ if verb.starts_with('$') => {
                let name = [&verb[1..], args].join(" ").trim().to_owned();
                let value =
                    env::var(&name).unwrap_or_else(|_| format!("Variable {} not found", name));

                self.print(value)?;
            }

            "echo" => {
                if !args.is_empty() {
                    let text = unquote(args).to_owned();
                    self.print(text)?;
                }
            }

            "ls" | "cd" | "pwd" | "cat" | "rm" | "chmod" => {
                self.fail(format_args!("{}: only works with VFS", verb))?;
            }

            "vfs-info" => self.print("VFS not loaded")?,

            _ => self.not_found(verb, args)?,
        }

        Ok(Flow::Continue)
    }

    fn ls(&mut self, args: &str) -> Result<()> {
        let mut long = false;
        let mut target = ".";

        for arg in args.split_whitespace() {
            match arg {
                "-l" => long = true,
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    return self.fail(format_args!("ls: invalid option '{}'", arg));
                }
                _ => target = arg,
            }
        }

        let path = self.cursor.absolute(target);

        let lines = match self.loaded()?.lookup(&path) {
            None => None,

            Some(node) => match node.children() {
                Some(children) => Some(
                    children
                        .values()
                        .map(|child| if long { long_entry(child) } else { entry(child) })
                        .collect::<Vec<_>>(),
                ),
                None => {
                    return self.fail(format_args!("ls: '{}': Not a directory", target));
                }
            },
        };

        let Some(lines) = lines else {
            return self.fail(format_args!(
                "ls: cannot access '{}': No such file or directory",
                target
            ));
        };

        for line in lines {
            self.print(line)?;
        }

        Ok(())
    }

    fn cd(&mut self, args: &str) -> Result<()> {
        let path = self.cursor.absolute(args);

        match self.loaded()?.lookup(&path).map(Node::is_dir) {
            Some(true) => {
                self.cursor.set(path);
                Ok(())
            }
            Some(false) => self.fail(format_args!("cd: not a directory: {}", args)),
            None => self.fail(format_args!("cd: no such directory: {}", args)),
        }
    }

    fn cat(&mut self, args: &str) -> Result<()> {
        if args.is_empty() {
            return self.fail("cat: missing operand");
        }

        let path = self.cursor.absolute(args);

        let content = match self.loaded()?.lookup(&path) {
            Some(node) => match node.content() {
                Some(content) => content.to_owned(),
                None => return self.fail(format_args!("cat: {}: Is a directory", args)),
            },
            None => return self.fail(format_args!("cat: {}: No such file", args)),
        };

        if content.ends_with('\n') {
            write!(self.out, "{}", content)?;
        } else {
            writeln!(self.out, "{}", content)?;
        }

        Ok(())
    }

    fn rm(&mut self, args: &str) -> Result<()> {
        if args.is_empty() {
            return self.fail("rm: missing operand");
        }

        let path = self.cursor.absolute(args);

        match self.loaded_mut()?.remove(&path) {
            Ok(()) => self.print(format_args!("Removed: {}", path)),
            Err(err) => {
                err.log();
                self.fail(err)
            }
        }
    }

    fn chmod(&mut self, args: &str) -> Result<()> {
        let [mode, target] = match args.split_whitespace().collect::<Vec<_>>()[..] {
            [mode, target] => [mode, target],
            _ => return self.fail("chmod: missing operand"),
        };

        let path = self.cursor.absolute(target);

        match self.loaded_mut()?.chmod(&path, mode) {
            Ok(mode) => self.print(format_args!(
                "Changed permissions of {} to {} ({})",
                path,
                mode.octal(),
                mode
            )),
            Err(err) => {
                err.log();
                self.fail(err)
            }
        }
    }

    fn vfs_info(&mut self) -> Result<()> {
        let vfs = self.loaded()?;
        let source = vfs.source().display().to_string();
        let (files, dirs) = vfs.stats();
        let cwd = self.cursor.get().to_owned();

        self.print(format_args!("VFS source: {}", source))?;
        self.print(format_args!("Current VFS path: {}", cwd))?;
        self.print(format_args!("Files: {}, directories: {}", files, dirs))?;
        self.print("Use 'ls' to see contents, 'cd' to navigate, 'cat' to view files")
    }

    fn not_found(&mut self, verb: &str, args: &str) -> Result<()> {
        if args.is_empty() {
            self.fail(format_args!("Command not found: {}", verb))
        } else {
            self.fail(format_args!("Command not found: {} {}", verb, args))
        }
    }

    fn fail(&mut self, message: impl Display) -> Result<()> {
        self.failed = true;
        self.print(message)
    }

    fn loaded(&self) -> Result<&Vfs> {
        self.vfs
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("VFS not loaded"))
    }

    fn loaded_mut(&mut self) -> Result<&mut Vfs> {
        self.vfs
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("VFS not loaded"))
    }
}

fn entry(node: &Node) -> String {
    if node.is_dir() {
        format!("{}{}/{}", BLUE, node.name, RESET)
    } else {
        format!("{}{}{}", GREEN, node.name, RESET)
    }
}

fn long_entry(node: &Node) -> String {
    format!(
        "{}{} {:>5} {:>5} {:>8} {}",
        if node.is_dir() { 'd' } else { '-' },
        node.meta.mode,
        node.meta.uid,
        node.meta.gid,
        node.size(),
        entry(node),
    )
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn shell() -> (TempDir, Shell<Vec<u8>>) {
        let dir = tempdir().unwrap();

        fs::create_dir_all(dir.path().join("a/sub")).unwrap();
        fs::write(dir.path().join("a/b.txt"), "hi").unwrap();
        fs::write(dir.path().join("a/sub/c.txt"), "c\n").unwrap();

        let vfs = Vfs::open(dir.path()).unwrap();
        let shell = Shell::new(Some(vfs), "tester".into(), None, Vec::new());

        (dir, shell)
    }

    fn run(shell: &mut Shell<Vec<u8>>, line: &str) -> String {
        shell.out.clear();
        shell.execute(line).unwrap();
        String::from_utf8(shell.out.clone()).unwrap()
    }

    #[test]
    fn navigation() {
        let (_dir, mut shell) = shell();

        assert_eq!("tester@vfs-terminal:/$ ", shell.prompt());

        run(&mut shell, "cd a");
        assert!(!shell.failed());
        assert_eq!("/a\n", run(&mut shell, "pwd"));

        run(&mut shell, "cd sub");
        assert_eq!("/a/sub", shell.cwd());

        run(&mut shell, "cd ..");
        assert_eq!("/a", shell.cwd());

        run(&mut shell, "cd ~");
        assert_eq!("/", shell.cwd());

        run(&mut shell, "cd /a/sub");
        run(&mut shell, "cd");
        assert_eq!("/", shell.cwd());
    }

    #[test]
    fn cd_rejects() {
        let (_dir, mut shell) = shell();

        assert_eq!("cd: no such directory: nope\n", run(&mut shell, "cd nope"));
        assert!(shell.failed());

        assert_eq!(
            "cd: not a directory: a/b.txt\n",
            run(&mut shell, "cd a/b.txt")
        );
        assert!(shell.failed());
        assert_eq!("/", shell.cwd());
    }

    #[test]
    fn ls() {
        let (_dir, mut shell) = shell();

        let out = run(&mut shell, "ls a");

        assert_eq!(
            format!("{GREEN}b.txt{RESET}\n{BLUE}sub/{RESET}\n"),
            out
        );

        let out = run(&mut shell, "ls -l /a");

        assert!(out.lines().next().unwrap().starts_with("-rw"), "{}", out);
        assert!(out.lines().nth(1).unwrap().starts_with("drwx"), "{}", out);

        run(&mut shell, "ls nope");
        assert!(shell.failed());

        assert_eq!("ls: 'a/b.txt': Not a directory\n", run(&mut shell, "ls a/b.txt"));
        assert!(shell.failed());

        run(&mut shell, "ls -z");
        assert!(shell.failed());
    }

    #[test]
    fn cat() {
        let (_dir, mut shell) = shell();

        assert_eq!("hi\n", run(&mut shell, "cat a/b.txt"));
        assert_eq!("c\n", run(&mut shell, "cat /a/sub/c.txt"));
        assert!(!shell.failed());

        assert_eq!("cat: a: Is a directory\n", run(&mut shell, "cat a"));
        assert!(shell.failed());

        assert_eq!("cat: x: No such file\n", run(&mut shell, "cat x"));
        assert!(shell.failed());

        run(&mut shell, "cat");
        assert!(shell.failed());
    }

    #[test]
    fn cat_through_dot_dot() {
        let (_dir, mut shell) = shell();

        assert_eq!("hi\n", run(&mut shell, "cat /a/../a/b.txt"));
        assert_eq!("hi\n", run(&mut shell, "cat /a/./sub/../b.txt"));
        assert!(!shell.failed());

        run(&mut shell, "cd a/sub");
        assert_eq!("hi\n", run(&mut shell, "cat ../b.txt"));
        assert_eq!("hi\n", run(&mut shell, "cat ../../a/b.txt"));
        assert!(!shell.failed());
        assert_eq!("/a/sub", shell.cwd());
    }

    #[test]
    fn rm() {
        let (_dir, mut shell) = shell();

        assert_eq!("Directory not empty: /a/sub\n", run(&mut shell, "rm a/sub"));
        assert!(shell.failed());

        run(&mut shell, "cd a/sub");
        assert_eq!("Removed: /a/sub/c.txt\n", run(&mut shell, "rm c.txt"));
        assert!(!shell.failed());

        run(&mut shell, "cd ..");
        run(&mut shell, "rm sub");
        assert!(!shell.failed());

        assert_eq!("Cannot remove root directory\n", run(&mut shell, "rm /"));
        assert!(shell.failed());

        assert_eq!(
            "File or directory not found: /a/sub\n",
            run(&mut shell, "rm sub")
        );
    }

    #[test]
    fn chmod() {
        let (_dir, mut shell) = shell();

        assert_eq!(
            "Changed permissions of /a/b.txt to 0o755 (rwxr-xr-x)\n",
            run(&mut shell, "chmod 755 a/b.txt")
        );

        let out = run(&mut shell, "ls -l a");
        assert!(out.starts_with("-rwxr-xr-x"), "{}", out);

        assert_eq!("Invalid mode format: 9\n", run(&mut shell, "chmod 9 a/b.txt"));
        assert!(shell.failed());

        run(&mut shell, "chmod 755");
        assert!(shell.failed());
    }

    #[test]
    fn unknown_and_exit() {
        let (_dir, mut shell) = shell();

        assert_eq!("Command not found: frob x\n", run(&mut shell, "frob x"));
        assert!(shell.failed());

        assert_eq!(Flow::Continue, shell.execute("   ").unwrap());
        assert!(!shell.failed());

        assert_eq!(Flow::Exit, shell.execute("exit").unwrap());
    }

    #[test]
    fn vfs_info() {
        let (dir, mut shell) = shell();

        let out = run(&mut shell, "vfs-info");

        assert!(out.contains(&format!("VFS source: {}", dir.path().display())));
        assert!(out.contains("Current VFS path: /"));
        assert!(out.contains("Files: 2, directories: 3"));
    }

    #[test]
    fn without_vfs() {
        let mut shell = Shell::new(None, "tester".into(), None, Vec::new());

        assert_eq!("tester@terminal:~$ ", shell.prompt());

        assert_eq!("hello world\n", run(&mut shell, "echo \"hello world\""));
        assert_eq!("'x\n", run(&mut shell, "echo 'x"));
        assert_eq!("", run(&mut shell, "echo"));

        assert_eq!("ls: only works with VFS\n", run(&mut shell, "ls"));
        assert!(shell.failed());

        assert_eq!("VFS not loaded\n", run(&mut shell, "vfs-info"));
        assert!(!shell.failed());

        assert_eq!(
            "Variable VFSTERM_SURELY_UNSET not found\n",
            run(&mut shell, "$VFSTERM_SURELY_UNSET")
        );

        run(&mut shell, "nope");
        assert!(shell.failed());
    }

    #[test]
    fn audits_every_line() {
        let (dir, _) = shell();
        let log_path = dir.path().join("audit.csv");
        let audit = AuditLog::create(&log_path).unwrap();
        let vfs = Vfs::open(&dir.path().join("a")).unwrap();
        let mut shell = Shell::new(Some(vfs), "tester".into(), Some(audit), Vec::new());

        shell.execute("ls").unwrap();
        shell.execute("").unwrap();
        shell.execute("cat nope").unwrap();

        let log = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<_> = log.lines().collect();

        assert_eq!(3, lines.len());
        assert!(lines[1].ends_with(",tester,ls,SUCCESS"), "{}", lines[1]);
        assert!(lines[2].ends_with(",tester,cat nope,ERROR"), "{}", lines[2]);
    }
}
