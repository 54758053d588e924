//! Render-agnostic description of what a region shows, plus a plain-text
//! renderer for terminals.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Loading,
    Error(String),
    Content(Vec<Panel>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn line(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        let line = Line {
            label: label.into(),
            value: value.into(),
        };
        match self.sections.last_mut() {
            Some(Section::Lines(lines)) => lines.push(line),
            _ => self.sections.push(Section::Lines(vec![line])),
        }
        self
    }

    pub fn numbers(mut self, heading: impl Into<String>, balls: Vec<Ball>) -> Self {
        self.sections.push(Section::Numbers {
            heading: heading.into(),
            balls,
        });
        self
    }

    pub fn tiles(mut self, tiles: Vec<Tile>) -> Self {
        self.sections.push(Section::Tiles(tiles));
        self
    }

    pub fn table(mut self, columns: &[&str], rows: Vec<Vec<String>>) -> Self {
        self.sections.push(Section::Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        });
        self
    }

    pub fn banner(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.sections.push(Section::Banner {
            tone,
            text: text.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Lines(Vec<Line>),
    Numbers { heading: String, balls: Vec<Ball> },
    Tiles(Vec<Tile>),
    Table { columns: Vec<String>, rows: Vec<Vec<String>> },
    Banner { tone: Tone, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ball {
    pub label: String,
    pub matched: bool,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub value: String,
    pub label: String,
}

impl Tile {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
}

/// Deterministic plain-text form of a block. Matched balls are bracketed.
pub fn render_text(block: &Block) -> String {
    let mut out = String::new();
    match block {
        Block::Loading => out.push_str("Carregando...\n"),
        Block::Error(message) => {
            let _ = writeln!(out, "[erro] {message}");
        }
        Block::Content(panels) => {
            for (index, panel) in panels.iter().enumerate() {
                if index > 0 {
                    out.push('\n');
                }
                render_panel(&mut out, panel);
            }
        }
    }
    out
}

fn render_panel(out: &mut String, panel: &Panel) {
    let _ = writeln!(out, "== {} ==", panel.title);
    for section in &panel.sections {
        match section {
            Section::Lines(lines) => {
                for line in lines {
                    let _ = writeln!(out, "{}: {}", line.label, line.value);
                }
            }
            Section::Numbers { heading, balls } => {
                let rendered: Vec<String> = balls
                    .iter()
                    .map(|ball| {
                        if ball.matched {
                            format!("[{}]", ball.label)
                        } else {
                            ball.label.clone()
                        }
                    })
                    .collect();
                let _ = writeln!(out, "{heading}: {}", rendered.join(" "));
            }
            Section::Tiles(tiles) => {
                let rendered: Vec<String> = tiles
                    .iter()
                    .map(|tile| format!("{}: {}", tile.label, tile.value))
                    .collect();
                let _ = writeln!(out, "{}", rendered.join(" | "));
            }
            Section::Table { columns, rows } => {
                let _ = writeln!(out, "{}", columns.join(" | "));
                for row in rows {
                    let _ = writeln!(out, "{}", row.join(" | "));
                }
            }
            Section::Banner { tone, text } => {
                let marker = match tone {
                    Tone::Success => "(!)",
                    Tone::Info => "(i)",
                };
                let _ = writeln!(out, "{marker} {text}");
            }
        }
    }
}
