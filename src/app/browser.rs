//! In-terminal folder picker.
//!
//! Row 0 always stands for the folder being browsed ("load this folder");
//! the remaining rows are its subdirectories.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct DirBrowser {
    cwd: PathBuf,
    dirs: Vec<PathBuf>,
    selected: usize,
    include_hidden: bool,
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn list_dirs(dir: &Path, include_hidden: bool) -> io::Result<Vec<PathBuf>> {
    // Surface "missing" / "not a directory" up front; walkdir would only
    // yield them as per-entry errors.
    if !std::fs::metadata(dir)?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("{} is not a directory", dir.display()),
        ));
    }

    let mut dirs: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .filter(|p| include_hidden || !is_hidden(p))
        .collect();

    dirs.sort_by_cached_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(dirs)
}

impl DirBrowser {
    /// Start browsing at `path`.
    pub fn open(path: &Path, include_hidden: bool) -> io::Result<Self> {
        let cwd = std::fs::canonicalize(path)?;
        let dirs = list_dirs(&cwd, include_hidden)?;
        Ok(Self {
            cwd,
            dirs,
            selected: 0,
            include_hidden,
        })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Number of rows, including the "this folder" row.
    pub fn rows(&self) -> usize {
        self.dirs.len() + 1
    }

    pub fn row_label(&self, row: usize) -> String {
        if row == 0 {
            return "./ (load this folder)".to_string();
        }
        self.dirs
            .get(row - 1)
            .and_then(|p| p.file_name())
            .map(|n| format!("{}/", n.to_string_lossy()))
            .unwrap_or_default()
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.rows() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The folder the highlighted row refers to.
    pub fn highlighted(&self) -> &Path {
        match self.selected {
            0 => &self.cwd,
            row => self.dirs.get(row - 1).map_or(self.cwd.as_path(), |p| p.as_path()),
        }
    }

    /// Act on the highlighted row.
    ///
    /// Row 0 returns the current folder as the choice; any other row descends
    /// into that subdirectory and returns `None`.
    pub fn activate(&mut self) -> io::Result<Option<PathBuf>> {
        if self.selected == 0 {
            return Ok(Some(self.cwd.clone()));
        }
        let target = self.highlighted().to_path_buf();
        self.enter(target)?;
        Ok(None)
    }

    /// Go to the parent folder, keeping the folder we left highlighted.
    pub fn ascend(&mut self) -> io::Result<()> {
        let Some(parent) = self.cwd.parent().map(Path::to_path_buf) else {
            return Ok(());
        };
        let child = self.cwd.clone();
        self.enter(parent)?;
        if let Some(pos) = self.dirs.iter().position(|d| *d == child) {
            self.selected = pos + 1;
        }
        Ok(())
    }

    fn enter(&mut self, dir: PathBuf) -> io::Result<()> {
        let dirs = list_dirs(&dir, self.include_hidden)?;
        self.cwd = dir;
        self.dirs = dirs;
        self.selected = 0;
        Ok(())
    }
}
