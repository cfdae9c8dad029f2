use std::fs;
use std::path::Path;

use bitflags::bitflags;

// The `S_IFREG` file type bit. The reference sqlar implementation stores the full `st_mode`, so
// entries added by this crate carry it too.
pub const FILE_TYPE_BITS: u32 = 0o100_000;

bitflags! {
    /// The permission bits of a file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileMode: u32 {
        /// Read for owner (`S_IRUSR`).
        const OWNER_R = 0o0400;

        /// Write for owner (`S_IWUSR`).
        const OWNER_W = 0o0200;

        /// Execute for owner (`S_IXUSR`).
        const OWNER_X = 0o0100;

        /// Read for group (`S_IRGRP`).
        const GROUP_R = 0o0040;

        /// Write for group (`S_IWGRP`).
        const GROUP_W = 0o0020;

        /// Execute for group (`S_IXGRP`).
        const GROUP_X = 0o0010;

        /// Read for others (`S_IROTH`).
        const OTHER_R = 0o0004;

        /// Write for others (`S_IWOTH`).
        const OTHER_W = 0o0002;

        /// Execute for others (`S_IXOTH`).
        const OTHER_X = 0o0001;

        /// Set user ID on execution (`S_ISUID`).
        const SUID = 0o4000;

        /// Set group ID on execution (`S_ISGID`).
        const SGID = 0o2000;

        /// The sticky bit (`S_ISVTX`).
        const STICKY = 0o1000;
    }
}

impl FileMode {
    /// Create a [`FileMode`] from the given raw mode bits, discarding the file type bits.
    pub fn from_mode(mode: u32) -> Self {
        Self::from_bits_truncate(mode)
    }

    /// The raw mode bits with the regular-file type bit set.
    pub fn to_file_mode(self) -> u32 {
        FILE_TYPE_BITS | self.bits()
    }
}

pub trait ReadMode {
    fn read_mode(&self, path: &Path, metadata: &fs::Metadata) -> crate::Result<FileMode>;
}

pub trait WriteMode {
    fn write_mode(&self, path: &Path, mode: FileMode) -> crate::Result<()>;
}

#[derive(Debug)]
#[cfg(unix)]
pub struct UnixModeAdapter;

#[cfg(unix)]
impl ReadMode for UnixModeAdapter {
    fn read_mode(&self, _path: &Path, metadata: &fs::Metadata) -> crate::Result<FileMode> {
        use std::os::unix::fs::MetadataExt;

        Ok(FileMode::from_mode(metadata.mode()))
    }
}

#[cfg(unix)]
impl WriteMode for UnixModeAdapter {
    fn write_mode(&self, path: &Path, mode: FileMode) -> crate::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(mode.bits());
        fs::set_permissions(path, perms)?;

        Ok(())
    }
}

#[derive(Debug)]
#[cfg(windows)]
pub struct WindowsModeAdapter;

#[cfg(windows)]
impl ReadMode for WindowsModeAdapter {
    fn read_mode(&self, _path: &Path, metadata: &fs::Metadata) -> crate::Result<FileMode> {
        // The reference sqlar implementation always uses `666` permissions when archiving files
        // on Windows, minus the write bits when the file is read-only.
        let mode = FileMode::OWNER_R | FileMode::GROUP_R | FileMode::OTHER_R;

        Ok(if metadata.permissions().readonly() {
            mode
        } else {
            mode | FileMode::OWNER_W | FileMode::GROUP_W | FileMode::OTHER_W
        })
    }
}

#[cfg(windows)]
impl WriteMode for WindowsModeAdapter {
    fn write_mode(&self, path: &Path, mode: FileMode) -> crate::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(
            !mode.intersects(FileMode::OWNER_W | FileMode::GROUP_W | FileMode::OTHER_W),
        );

        fs::set_permissions(path, permissions)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use xpct::{be_ok, equal, expect};

    #[test]
    fn from_mode_discards_file_type_bits() {
        let mode = FileMode::from_mode(FILE_TYPE_BITS | 0o644);

        expect!(mode.bits()).to(equal(0o644));
    }

    #[test]
    fn to_file_mode_sets_file_type_bits() {
        let mode = FileMode::OWNER_R | FileMode::OWNER_W;

        expect!(mode.to_file_mode()).to(equal(FILE_TYPE_BITS | 0o600));
    }

    #[test]
    #[cfg(unix)]
    fn unix_mode_adapter_reads_mode() -> crate::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let expected_mode = FileMode::OWNER_R | FileMode::GROUP_R | FileMode::OTHER_R;
        let adapter = UnixModeAdapter;

        let temp_file = tempfile::NamedTempFile::new()?;
        fs::set_permissions(
            temp_file.path(),
            fs::Permissions::from_mode(expected_mode.bits()),
        )?;

        expect!(adapter.read_mode(temp_file.path(), &fs::metadata(temp_file.path())?))
            .to(be_ok())
            .to(equal(expected_mode));

        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn unix_mode_adapter_writes_mode() -> crate::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let expected_mode = FileMode::OWNER_R | FileMode::OWNER_W;
        let adapter = UnixModeAdapter;

        let temp_file = tempfile::NamedTempFile::new()?;

        adapter.write_mode(temp_file.path(), expected_mode)?;

        let actual_mode = fs::metadata(temp_file.path())?.permissions().mode();

        expect!(actual_mode & 0o7777).to(equal(expected_mode.bits()));

        Ok(())
    }
}
