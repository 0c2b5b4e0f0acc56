use crate::command::{Command, HELP};
use flatfs::{BlockMap, FlatFSError, MAX_FILE_SIZE, MAX_TOTAL_BLOCKS};
use flatfs_tool_lib::{
    format_image, mount_image, u64_to_sized_string, ImageError, ImageFilesystem,
};
use log::debug;

/// Blocks printed on each row of the disk map.
const DISK_MAP_ROW: usize = 64;

type ShellResult = Result<String, String>;

/// The state of one shell session: at most one mounted image.
pub struct Session {
    fs: Option<ImageFilesystem>,
    mounted_path: Option<String>,
}

fn describe(error: FlatFSError<ImageError>) -> String {
    use FlatFSError::*;

    return match error {
        InvalidImage => "The image is not a valid flatfs image.".to_string(),
        InvalidImageSize => format!(
            "The image must hold between 6 and {} blocks of 4096 bytes.",
            MAX_TOTAL_BLOCKS
        ),
        NoFreeInode => "No free inode is available.".to_string(),
        NoFreeSpace => "The image is out of free blocks.".to_string(),
        FileTooLarge => format!("Files are limited to {} bytes.", MAX_FILE_SIZE),
        FileNotFound => "No such file.".to_string(),
        FileExists => "A file with that name already exists.".to_string(),
        InvalidFileName => "File names must be 1 to 63 printable bytes.".to_string(),
        IoError(e) => format!("Disk error: {}", e.get_message()),
    };
}

/// Renders the map as rows of `#` for used blocks and `.` for free ones.
pub fn render_disk_map(map: &BlockMap) -> String {
    let mut out = String::from("DISK MAP:");

    for (row, chunk) in map.occupancy.chunks(DISK_MAP_ROW).enumerate() {
        out.push_str(&format!("\n{:04}: ", row * DISK_MAP_ROW));
        out.extend(chunk.iter().map(|used| if *used { '#' } else { '.' }));
    }

    return out;
}

impl Session {
    pub fn new() -> Self {
        return Self {
            fs: None,
            mounted_path: None,
        };
    }

    pub fn is_mounted(&self) -> bool {
        return self.fs.is_some();
    }

    fn mounted(&mut self) -> Result<&mut ImageFilesystem, String> {
        return match self.fs.as_mut() {
            Some(fs) => Ok(fs),
            None => Err("No filesystem is mounted.".to_string()),
        };
    }

    /// Runs one command and returns the text to show the user.
    pub fn execute(&mut self, command: &Command) -> ShellResult {
        debug!("executing {:?}", command);

        return match command {
            Command::Help => Ok(HELP.to_string()),
            Command::Exit => Ok(String::new()),
            Command::Format { image, size } => self.format(image, *size),
            Command::Mount { image } => self.mount(image),
            Command::Create { name, size } => self.create(name, *size),
            Command::Delete { name } => {
                self.mounted()?.delete(name).map_err(describe)?;
                Ok(format!("Deleted file '{}'.", name))
            }
            Command::Write { name, text } => self.write(name, text),
            Command::Read { name, max } => self.read(name, *max),
            Command::List => self.list(),
            Command::DiskMap => Ok(render_disk_map(&self.mounted()?.inspect_block_map())),
            Command::Info => self.info(),
        };
    }

    fn format(&mut self, image: &str, size: u64) -> ShellResult {
        // Let go of the old image before it might be truncated.
        self.fs = None;
        self.mounted_path = None;

        let fs = format_image(image, size).map_err(describe)?;
        let blocks = fs.super_block().total_blocks();

        self.fs = Some(fs);
        self.mounted_path = Some(image.to_string());

        return Ok(format!(
            "Formatted {} ({}), {} blocks. The image is now mounted.",
            image,
            u64_to_sized_string(size),
            blocks
        ));
    }

    fn mount(&mut self, image: &str) -> ShellResult {
        let fs = mount_image(image).map_err(describe)?;
        let blocks = fs.super_block().total_blocks();

        self.fs = Some(fs);
        self.mounted_path = Some(image.to_string());

        return Ok(format!(
            "Filesystem mounted successfully.\nTotal blocks: {}",
            blocks
        ));
    }

    fn create(&mut self, name: &str, size: u32) -> ShellResult {
        let fs = self.mounted()?;
        fs.create(name, size).map_err(describe)?;
        let entry = fs.stat(name).map_err(describe)?;

        return Ok(format!(
            "Created file '{}' in inode {} with {} blocks.",
            name,
            entry.slot,
            entry.blocks.len()
        ));
    }

    fn write(&mut self, name: &str, text: &str) -> ShellResult {
        let fs = self.mounted()?;
        fs.write(name, text.as_bytes()).map_err(describe)?;

        let written = text.len().min(MAX_FILE_SIZE as usize);

        return Ok(format!("Wrote {} bytes to '{}'.", written, name));
    }

    fn read(&mut self, name: &str, max: u32) -> ShellResult {
        let contents = self.mounted()?.read(name, max).map_err(describe)?;

        return Ok(format!(
            "Read {} bytes from '{}':\n{}",
            contents.len(),
            name,
            String::from_utf8_lossy(&contents)
        ));
    }

    fn list(&mut self) -> ShellResult {
        let files = self.mounted()?.list_occupied_inodes();

        if files.is_empty() {
            return Ok("No files.".to_string());
        }

        let mut out = String::from("Files:");
        for file in files {
            out.push_str(&format!(
                "\n  {:3}: {} ({} bytes)",
                file.slot, file.name, file.size
            ));
        }

        return Ok(out);
    }

    fn info(&mut self) -> ShellResult {
        let path = self.mounted_path.clone().unwrap_or_default();
        let info = self.mounted()?.disk_info();

        return Ok(format!(
            "Image: {}\nBlock size: {}\nTotal blocks: {}\nData blocks: {}\nFree blocks: {} ({})\nFiles: {}\nFree inodes: {}",
            path,
            info.block_size(),
            info.total_blocks(),
            info.data_block_count(),
            info.free_block_count(),
            u64_to_sized_string(info.free_block_space()),
            info.number_of_files(),
            info.free_file_slots()
        ));
    }
}
