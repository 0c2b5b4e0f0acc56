use flatfs_tool_lib::sized_string_to_u64;
use std::convert::TryFrom;

/// Limit for `read` when no maximum is given.
pub const DEFAULT_READ_LIMIT: u32 = 1024;

pub const HELP: &str = "Commands:
  format <image> <size>
  mount <image>
  create <name> <size>
  delete <name>
  write <name> <text...>
  read <name> [max]
  list
  diskmap
  info
  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Format { image: String, size: u64 },
    Mount { image: String },
    Create { name: String, size: u32 },
    Delete { name: String },
    Write { name: String, text: String },
    Read { name: String, max: u32 },
    List,
    DiskMap,
    Info,
    Exit,
}

/// Splits off the first whitespace separated word.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();

    return match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim_start()),
        None => (text, ""),
    };
}

fn parse_size(text: &str) -> Option<u32> {
    return sized_string_to_u64(text).and_then(|n| u32::try_from(n).ok());
}

impl Command {
    /// Parses one line of input. Blank lines give `Ok(None)`, bad input gives a message for the
    /// user.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let (keyword, arguments) = split_word(line.trim());

        if keyword.is_empty() {
            return Ok(None);
        }

        let words: Vec<&str> = arguments.split_whitespace().collect();

        let command = match keyword {
            "help" => Command::Help,
            "list" => Command::List,
            "diskmap" => Command::DiskMap,
            "info" => Command::Info,
            "exit" | "quit" => Command::Exit,
            "format" => match words.as_slice() {
                [image, size] => match sized_string_to_u64(size) {
                    Some(size) => Command::Format {
                        image: image.to_string(),
                        size,
                    },
                    None => return Err(format!("Could not understand the size '{}'.", size)),
                },
                _ => return Err("Usage: format <image> <size>".to_string()),
            },
            "mount" => match words.as_slice() {
                [image] => Command::Mount {
                    image: image.to_string(),
                },
                _ => return Err("Usage: mount <image>".to_string()),
            },
            "create" => match words.as_slice() {
                [name, size] => match parse_size(size) {
                    Some(size) => Command::Create {
                        name: name.to_string(),
                        size,
                    },
                    None => return Err(format!("Could not understand the size '{}'.", size)),
                },
                _ => return Err("Usage: create <name> <size>".to_string()),
            },
            "delete" => match words.as_slice() {
                [name] => Command::Delete {
                    name: name.to_string(),
                },
                _ => return Err("Usage: delete <name>".to_string()),
            },
            "write" => {
                let (name, text) = split_word(arguments);

                if name.is_empty() || text.is_empty() {
                    return Err("Usage: write <name> <text...>".to_string());
                }

                Command::Write {
                    name: name.to_string(),
                    text: text.to_string(),
                }
            }
            "read" => match words.as_slice() {
                [name] => Command::Read {
                    name: name.to_string(),
                    max: DEFAULT_READ_LIMIT,
                },
                [name, max] => match parse_size(max) {
                    Some(max) => Command::Read {
                        name: name.to_string(),
                        max,
                    },
                    None => return Err(format!("Could not understand the size '{}'.", max)),
                },
                _ => return Err("Usage: read <name> [max]".to_string()),
            },
            _ => return Err("Unknown command. Type 'help'.".to_string()),
        };

        return Ok(Some(command));
    }
}
