use crate::view::{FileSelection, Snapshot, PREVIEW_BYTES};
use crate::{VisualiserError, UI};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use flatfs_tool_lib::{mount_image_read_only, ImageFilesystem};
use log::info;
use std::path::Path;

pub struct Application {
    path: String,
    quit: bool,
    ui: UI,
}

impl Application {
    pub fn new(image_path: String) -> Result<Self, VisualiserError> {
        if !Path::new(&image_path).exists() {
            return Err(VisualiserError::new(&format!(
                "No image file found with path: {}",
                image_path
            )));
        }

        return Ok(Self {
            path: image_path,
            quit: false,
            ui: UI::new()?,
        });
    }

    pub fn run(&mut self) -> Result<(), VisualiserError> {
        let fs = match mount_image_read_only(&self.path) {
            Ok(fs) => fs,
            Err(e) => {
                return Err(VisualiserError::new(&format!(
                    "Failed to mount {}: {}",
                    self.path, e
                )))
            }
        };

        info!("viewing {}", self.path);

        match enable_raw_mode() {
            Ok(_) => (),
            Err(_) => {
                return Err(VisualiserError::new(
                    "Couldn't enable raw mode for the terminal.",
                ))
            }
        }

        let res = self.main_loop(&fs);
        self.ui.try_clear();
        ignore_result!(disable_raw_mode());
        self.ui.show_cursor();

        return res;
    }

    fn main_loop(&mut self, fs: &ImageFilesystem) -> Result<(), VisualiserError> {
        let files = fs.list_occupied_inodes();
        let map = fs.inspect_block_map();
        let disk_info = fs.disk_info();
        let mut selection = FileSelection::new(files.len());

        while !self.quit {
            let preview = match selection.selected().and_then(|i| files.get(i)) {
                Some(file) => fs.read(&file.name, PREVIEW_BYTES)?,
                None => Vec::new(),
            };

            self.ui.render(&Snapshot {
                path: &self.path,
                files: &files,
                selected: selection.selected(),
                map: &map,
                info: &disk_info,
                preview: &preview,
            })?;

            match self.blocking_read_key()? {
                Some(k) => match k.code {
                    KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                    KeyCode::Down => selection.next(),
                    KeyCode::Up => selection.previous(),
                    _ => (),
                },
                None => (),
            }
        }

        return Ok(());
    }

    fn blocking_read_key(&mut self) -> Result<Option<KeyEvent>, VisualiserError> {
        let event = match crossterm::event::read() {
            Ok(e) => e,
            Err(e) => return Err(VisualiserError::new(&format!("{}", e))),
        };

        let key = match event {
            Event::Key(kv) => kv,
            _ => return Ok(None),
        };

        if key == KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL) {
            return Err(VisualiserError::new("SIGINT was found"));
        } else {
            return Ok(Some(key));
        }
    }
}
