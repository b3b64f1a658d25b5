//! Size-bounded log file
//!
//! Appends to `<dir>/<name>.log`; once the next write would push it past the
//! limit the file is renamed to `<name>.log.1` (replacing the previous one)
//! and a fresh file is started.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub struct RollingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
}

impl RollingFile {
    pub fn open(dir: &Path, name: &str, max_bytes: u64) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self { path, file, written, max_bytes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".1");
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        fs::rename(&self.path, self.backup_path())?;
        self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotates_when_full() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = RollingFile::open(dir.path(), "app", 16).unwrap();

        file.write_all(b"0123456789\n").unwrap();
        file.write_all(b"abcdefghij\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(file.backup_path()).unwrap(), "0123456789\n");
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "abcdefghij\n");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.log"), "earlier\n").unwrap();

        let mut file = RollingFile::open(dir.path(), "app", 1024).unwrap();
        file.write_all(b"later\n").unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "earlier\nlater\n");
        assert!(!file.backup_path().exists());
    }
}
