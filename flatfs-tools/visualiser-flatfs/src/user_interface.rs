use crate::error::VisualiserError;
use crate::view::{hex_lines, Snapshot, MAP_ROW_LENGTH, PREVIEW_BYTES};
use flatfs_tool_lib::u64_to_sized_string;
use std::io;
use std::io::Stdout;
use tui::backend::CrosstermBackend;
use tui::layout::{Constraint, Direction, Layout};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tui::Terminal;

type TerminalBackend = CrosstermBackend<Stdout>;

/// Height of the details pane with a full hex preview.
const DETAILS_HEIGHT: u16 = 7 + (PREVIEW_BYTES / 16) as u16;

fn glyph_style(glyph: char) -> Style {
    let colour = match glyph {
        'S' => Color::Magenta,
        'B' => Color::Cyan,
        'I' => Color::Blue,
        '*' => Color::Yellow,
        '#' => Color::Green,
        _ => Color::DarkGray,
    };

    return Style::default().fg(colour);
}

pub struct UI {
    terminal: Terminal<TerminalBackend>,
    highlight_style: Style,
    default_style: Style,
}

impl UI {
    pub fn new() -> Result<Self, VisualiserError> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                return Err(VisualiserError::new_internal(&format!(
                    "Terminal creation error: {}",
                    e
                )))
            }
        };

        return Ok(Self {
            terminal,
            default_style: Style::default().fg(Color::White),
            highlight_style: Style::default()
                .add_modifier(Modifier::ITALIC)
                .add_modifier(Modifier::REVERSED),
        });
    }

    /// Draws the file list, the block map and the details of the selected file.
    pub fn render(&mut self, snapshot: &Snapshot) -> Result<(), VisualiserError> {
        let default_style = self.default_style;
        let highlight_style = self.highlight_style;

        let items: Vec<ListItem> = snapshot
            .files
            .iter()
            .map(|f| ListItem::new(Span::raw(format!("{}: {} ({} bytes)", f.slot, f.name, f.size))))
            .collect();

        let map_text: Vec<Spans> = snapshot
            .map_rows()
            .iter()
            .enumerate()
            .map(|(row, glyphs)| {
                let mut spans = vec![Span::raw(format!(
                    "{:04} ",
                    row * MAP_ROW_LENGTH
                ))];
                spans.extend(
                    glyphs
                        .chars()
                        .map(|g| Span::styled(g.to_string(), glyph_style(g))),
                );
                Spans::from(spans)
            })
            .collect();

        let info = snapshot.info;
        let mut details = vec![
            Spans::from(format!("Image: {}", snapshot.path)),
            Spans::from(format!(
                "Blocks: {} of {} bytes, {} free ({})",
                info.total_blocks(),
                info.block_size(),
                info.free_block_count(),
                u64_to_sized_string(info.free_block_space())
            )),
            Spans::from(format!(
                "Files: {}, free inodes: {}",
                info.number_of_files(),
                info.free_file_slots()
            )),
            Spans::from(""),
        ];

        match snapshot.selected_file() {
            Some(file) => {
                details.push(Spans::from(format!(
                    "{} - {} bytes, blocks {:?}",
                    file.name, file.size, file.blocks
                )));
                details.extend(hex_lines(snapshot.preview).into_iter().map(Spans::from));
            }
            None => details.push(Spans::from("The image holds no files.")),
        }

        let footer = vec![Spans::from(vec![
            Span::raw("q, esc - Quit"),
            Span::raw("    "),
            Span::raw("↑,↓ - Select File"),
        ])];

        let mut state = ListState::default();
        state.select(snapshot.selected);

        match self.terminal.draw(|f| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(10),
                    Constraint::Length(DETAILS_HEIGHT),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(36), Constraint::Min(72)])
                .split(rows[0]);

            let list = List::new(items)
                .block(Block::default().title("Files").borders(Borders::ALL))
                .style(default_style)
                .highlight_style(highlight_style)
                .highlight_symbol(">> ");

            let details_block = Paragraph::new(details)
                .style(default_style)
                .block(Block::default().title("Details").borders(Borders::ALL))
                .wrap(Wrap { trim: false });

            let map_block = Paragraph::new(map_text)
                .style(default_style)
                .block(Block::default().title("Block Map").borders(Borders::ALL));

            let footer_block = Paragraph::new(footer)
                .style(default_style)
                .block(Block::default().title("Keys").borders(Borders::ALL));

            f.render_stateful_widget(list, columns[0], &mut state);
            f.render_widget(map_block, columns[1]);
            f.render_widget(details_block, rows[1]);
            f.render_widget(footer_block, rows[2]);
        }) {
            Ok(_) => (),
            Err(e) => {
                return Err(VisualiserError::new_internal(&format!(
                    "Failed to render the image view. Error: {}",
                    e
                )))
            }
        }

        return Ok(());
    }

    /// Tries to clear the screen. Not guaranteed to succeed and no error will be reported if it fails.
    pub fn try_clear(&mut self) {
        ignore_result!(self.terminal.clear());
    }

    /// Shows the cursor, ignoring any errors
    pub fn show_cursor(&mut self) {
        ignore_result!(self.terminal.show_cursor());
    }
}
