use flatfs::{BlockMap, BlockRole, DiskInfo, FileEntry};

/// Number of glyphs on each row of the block map.
pub const MAP_ROW_LENGTH: usize = 64;
/// Bytes of the selected file shown in the preview pane.
pub const PREVIEW_BYTES: u32 = 256;

/// Everything one frame of the interface shows.
pub struct Snapshot<'a> {
    pub path: &'a str,
    pub files: &'a [FileEntry],
    pub selected: Option<usize>,
    pub map: &'a BlockMap,
    pub info: &'a DiskInfo,
    pub preview: &'a [u8],
}

impl<'a> Snapshot<'a> {
    pub fn selected_file(&self) -> Option<&'a FileEntry> {
        return self.selected.and_then(|i| self.files.get(i));
    }

    /// One string of glyphs per map row, blocks of the selected file drawn as `*`.
    pub fn map_rows(&self) -> Vec<String> {
        let highlighted = match self.selected_file() {
            Some(f) => f.blocks.as_slice(),
            None => &[],
        };

        let glyphs: Vec<char> = self
            .map
            .roles
            .iter()
            .zip(self.map.occupancy.iter())
            .enumerate()
            .map(|(index, (role, used))| {
                block_glyph(*role, *used, highlighted.contains(&(index as u32)))
            })
            .collect();

        return glyphs
            .chunks(MAP_ROW_LENGTH)
            .map(|row| row.iter().collect())
            .collect();
    }
}

pub fn block_glyph(role: BlockRole, used: bool, highlighted: bool) -> char {
    return match role {
        BlockRole::SuperBlock => 'S',
        BlockRole::Bitmap => 'B',
        BlockRole::InodeTable => 'I',
        BlockRole::Data if highlighted => '*',
        BlockRole::Data if used => '#',
        BlockRole::Data => '.',
    };
}

/// Formats bytes as an offset followed by 16 space separated hex pairs per line.
pub fn hex_lines(bytes: &[u8]) -> Vec<String> {
    return bytes
        .chunks(16)
        .enumerate()
        .map(|(row, chunk)| {
            let pairs: Vec<String> = chunk.iter().map(|b| hex::encode([*b])).collect();
            format!("{:04x}  {}", row * 16, pairs.join(" "))
        })
        .collect();
}

/// Cursor over the file list, wrapping at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSelection {
    selected: Option<usize>,
    length: usize,
}

impl FileSelection {
    pub fn new(length: usize) -> Self {
        return Self {
            selected: if length > 0 { Some(0) } else { None },
            length,
        };
    }

    #[inline]
    pub fn selected(&self) -> Option<usize> {
        return self.selected;
    }

    pub fn next(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some((i + 1) % self.length);
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = self.selected {
            if i == 0 {
                self.selected = Some(self.length - 1);
            } else {
                self.selected = Some(i - 1);
            }
        }
    }
}
