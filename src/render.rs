use chrono::TimeDelta;

use crate::error::Result;
use crate::surface::Surface;

const FILLED: char = '█';

#[derive(Debug, PartialEq, Eq)]
pub struct Glyph {
    rows: &'static [&'static str],
}

impl Glyph {
    pub fn width(&self) -> i32 {
        self.rows
            .first()
            .map_or(0, |row| row.chars().count() as i32)
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }
}

static DIGITS: [Glyph; 10] = [
    Glyph { rows: &["█████ ", "█   █ ", "█   █ ", "█   █ ", "█████ "] },
    Glyph { rows: &["    █ ", "    █ ", "    █ ", "    █ ", "    █ "] },
    Glyph { rows: &["█████ ", "    █ ", "█████ ", "█     ", "█████ "] },
    Glyph { rows: &["█████ ", "    █ ", "█████ ", "    █ ", "█████ "] },
    Glyph { rows: &["█   █ ", "█   █ ", "█████ ", "    █ ", "    █ "] },
    Glyph { rows: &["█████ ", "█     ", "█████ ", "    █ ", "█████ "] },
    Glyph { rows: &["█████ ", "█     ", "█████ ", "█   █ ", "█████ "] },
    Glyph { rows: &["█████ ", "    █ ", "    █ ", "    █ ", "    █ "] },
    Glyph { rows: &["█████ ", "█   █ ", "█████ ", "█   █ ", "█████ "] },
    Glyph { rows: &["█████ ", "█   █ ", "█████ ", "    █ ", "█████ "] },
];
static COLON: Glyph = Glyph { rows: &["  ", "█ ", "  ", "█ ", "  "] };
static MINUS: Glyph = Glyph { rows: &["     ", "     ", "████ ", "     ", "     "] };
static BLANK: Glyph = Glyph { rows: &["   ", "   ", "   ", "   ", "   "] };

fn glyph(c: char) -> &'static Glyph {
    match c {
        '0'..='9' => &DIGITS[c as usize - '0' as usize],
        ':' => &COLON,
        '-' => &MINUS,
        _ => &BLANK,
    }
}

#[derive(Debug)]
pub struct Text(Vec<&'static Glyph>);

impl Text {
    pub fn width(&self) -> i32 {
        self.0.iter().map(|g| g.width()).sum()
    }

    pub fn height(&self) -> i32 {
        self.0.iter().map(|g| g.height()).max().unwrap_or(0)
    }

    pub fn glyphs(&self) -> &[&'static Glyph] {
        &self.0
    }
}

pub fn to_text(s: &str) -> Text {
    Text(s.chars().map(glyph).collect())
}

/// Formats as `MM:SS`, or `HH:MM:SS` from one hour up, rounded to the second.
pub fn format_duration(d: TimeDelta) -> String {
    let mut secs = d.num_seconds();
    let sub = d.subsec_nanos();
    if sub >= 500_000_000 {
        secs += 1;
    } else if sub <= -500_000_000 {
        secs -= 1;
    }

    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;

    if h < 1 {
        format!("{sign}{m:02}:{s:02}")
    } else {
        format!("{sign}{h:02}:{m:02}:{s:02}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub x: i32,
    pub y: i32,
    pub scale: i32,
}

impl Layout {
    /// Centers `text`, at the largest scale where `widest` drawn from the
    /// same origin still fits in `width` x `height`.
    pub fn centered(text: &Text, widest: &Text, width: u16, height: u16) -> Layout {
        let (w, h) = (i32::from(width), i32::from(height));
        let tw = text.width().max(1);
        let th = text.height().max(widest.height()).max(1);
        let ww = widest.width().max(tw);

        let fits = |s: i32| th * s <= h && w / 2 - tw * s / 2 + ww * s <= w;
        let mut scale = 1;
        while fits(scale + 1) {
            scale += 1;
        }

        Layout {
            x: w / 2 - tw * scale / 2,
            y: h / 2 - th * scale / 2,
            scale,
        }
    }
}

/// Draws formatted strings onto a [`Surface`]; the layout is fixed by the first draw.
#[derive(Debug, Default)]
pub struct Renderer {
    layout: Option<Layout>,
    widest: Option<Text>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the layout so `widest` fits too, even if it is drawn later.
    pub fn reserving(widest: &str) -> Self {
        Renderer {
            layout: None,
            widest: Some(to_text(widest)),
        }
    }

    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    pub fn draw<S: Surface>(&mut self, surface: &mut S, s: &str) -> Result<()> {
        surface.clear();

        let text = to_text(s);
        let widest = self.widest.as_ref().unwrap_or(&text);
        let layout = *self.layout.get_or_insert_with(|| {
            let (w, h) = surface.size();
            Layout::centered(&text, widest, w, h)
        });

        let mut x = layout.x;
        for g in text.glyphs() {
            stamp(surface, g, x, layout.y, layout.scale);
            x += g.width() * layout.scale;
        }

        surface.flush()
    }
}

fn stamp<S: Surface>(surface: &mut S, g: &Glyph, x: i32, y: i32, scale: i32) {
    for (row, line) in g.rows.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            if c != FILLED {
                continue;
            }
            let (cx, cy) = (x + col as i32 * scale, y + row as i32 * scale);
            for dy in 0..scale {
                for dx in 0..scale {
                    surface.draw_cell(cx + dx, cy + dy, FILLED);
                }
            }
        }
    }
}
