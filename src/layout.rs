//! Geometry for the touch UI
//!
//! The window itself is drawn by the platform renderer; this module holds the
//! parts that decide *what* gets drawn and *what* a touch hits, so they can be
//! tested without a display.

use log::{debug, info};

use crate::error::Result;
use crate::playback::PlaybackControl;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line { from: Point, to: Point },
    Circle { center: Point, radius: f32 },
    Rect { pos: Point, size: Point },
    Triangle { a: Point, b: Point, c: Point },
    Text { text: String, pos: Point, font_size: i32 },
}

impl Shape {
    /// Whether a touch at `p` lands on this shape. Lines and text are never
    /// tappable.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Line { .. } | Shape::Text { .. } => false,
            Shape::Circle { center, radius } => {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                dx * dx + dy * dy <= radius * radius
            }
            Shape::Rect { pos, size } => {
                let dx = p.x - pos.x;
                let dy = p.y - pos.y;
                dx >= 0.0 && dy >= 0.0 && dx <= size.x && dy <= size.y
            }
            Shape::Triangle { a, b, c } => {
                // Same sign on all three edges, either winding
                let d1 = edge(p, *a, *b);
                let d2 = edge(p, *b, *c);
                let d3 = edge(p, *c, *a);
                let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
                let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
                !(has_neg && has_pos)
            }
        }
    }
}

fn edge(p: Point, a: Point, b: Point) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

/// Longest prefix of `text` (on a char boundary) whose measured width fits
/// in `max_width`. `measure` must be monotone in prefix length.
pub fn truncate_to_width<'a>(
    text: &'a str,
    max_width: i32,
    measure: impl Fn(&str) -> i32,
) -> &'a str {
    if text.is_empty() || measure(text) <= max_width {
        return text;
    }

    let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();

    // Invariant: prefix ending at bounds[lo] fits; at bounds[hi + 1] it doesn't
    let mut lo = 0;
    let mut hi = bounds.len() - 1;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if measure(&text[..bounds[mid]]) <= max_width {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    &text[..bounds[lo]]
}

/// Redraw rate policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate;

impl FrameRate {
    pub const ACTIVE: u32 = 30;
    pub const STATIC: u32 = 5;

    /// High rate while a touch is down or was just released
    pub fn target(touching: bool, was_touching: bool) -> u32 {
        if touching || was_touching {
            Self::ACTIVE
        } else {
            Self::STATIC
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Close,
    TogglePlay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub area: Shape,
    pub label: String,
    pub action: Action,
}

/// Tappable controls: the close button and the play/pause toggle
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    buttons: Vec<Button>,
}

impl Controls {
    pub const PLAY_LABEL: &'static str = " play";
    pub const PAUSE_LABEL: &'static str = "pause";

    /// Lay the controls out for a `width` x `height` screen.
    ///
    /// `measure(text, font_size)` is the renderer's text width.
    pub fn new(width: i32, height: i32, font_size: i32, measure: impl Fn(&str, i32) -> i32) -> Self {
        let panel = panel_rect(width, height);

        let close_font = font_size + 20;
        let close_w = measure("close", close_font);
        let close_x = width - close_w - 90;
        let close_y = 90;

        let play_font = font_size + 10;
        let play_w = measure(Self::PAUSE_LABEL, play_font);
        let play_x = (width - play_w) / 2;
        let play_y = panel.1 - play_font - 30;

        let buttons = vec![
            Button {
                area: padded(close_x, close_y, close_w, close_font),
                label: "close".to_string(),
                action: Action::Close,
            },
            Button {
                area: padded(play_x, play_y, play_w, play_font),
                label: Self::PLAY_LABEL.to_string(),
                action: Action::TogglePlay,
            },
        ];

        Self { buttons }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Actions triggered by a touch released at `p`
    pub fn release(&self, p: Point) -> Vec<Action> {
        self.buttons
            .iter()
            .filter(|b| b.area.contains(p))
            .map(|b| b.action)
            .collect()
    }

    /// Carry out `action` against the playback state, updating labels.
    /// Returns `false` once the window should close.
    pub fn apply(&mut self, action: Action, control: &PlaybackControl) -> Result<bool> {
        match action {
            Action::Close => {
                control.close()?;
                Ok(false)
            }
            Action::TogglePlay => {
                let playing = control.toggle()?;
                let label = if playing { Self::PAUSE_LABEL } else { Self::PLAY_LABEL };
                for button in self.buttons.iter_mut().filter(|b| b.action == Action::TogglePlay) {
                    button.label = label.to_string();
                }
                info!("play toggled, label now `{}`", label);
                Ok(true)
            }
        }
    }
}

/// Background panel: 80% x 50% of the screen, centred. Returns (x, y, w, h).
fn panel_rect(width: i32, height: i32) -> (i32, i32, i32, i32) {
    let w = width * 4 / 5;
    let h = height / 2;
    ((width - w) / 2, (height - h) / 2, w, h)
}

/// Tap target around a text label
fn padded(x: i32, y: i32, text_w: i32, text_h: i32) -> Shape {
    Shape::Rect {
        pos: Point::new((x - 32) as f32, (y - 16) as f32),
        size: Point::new((text_w + 64) as f32, (text_h + 32) as f32),
    }
}

/// Row placement for the track list inside the background panel
#[derive(Debug, Clone, PartialEq)]
pub struct TrackListLayout {
    pub pad: i32,
    pub text_pad: i32,
    pub font_size: i32,
    pub first_row: Point,
    pub row_size: Point,
}

impl TrackListLayout {
    pub fn new(width: i32, height: i32, pad: i32, font_size: i32) -> Self {
        let (x, y, w, _) = panel_rect(width, height);
        Self {
            pad,
            text_pad: font_size / 2,
            font_size,
            first_row: Point::new((x + pad) as f32, (y + pad) as f32),
            row_size: Point::new((w - 2 * pad) as f32, (2 * font_size) as f32),
        }
    }

    /// Rectangle of row `index`
    pub fn row(&self, index: usize) -> Shape {
        let step = self.row_size.y + self.pad as f32;
        Shape::Rect {
            pos: Point::new(self.first_row.x, self.first_row.y + step * index as f32),
            size: self.row_size,
        }
    }

    /// Width available for a row's text
    pub fn text_width(&self) -> i32 {
        self.row_size.x as i32 - 2 * self.text_pad
    }

    /// Track names cut to fit their rows
    pub fn truncate_all<'a>(
        &self,
        tracks: &'a [String],
        measure: impl Fn(&str, i32) -> i32,
    ) -> Vec<&'a str> {
        let width = self.text_width();
        tracks
            .iter()
            .map(|t| {
                let cut = truncate_to_width(t, width, |s| measure(s, self.font_size));
                if cut.len() < t.len() {
                    debug!("truncated track `{}` to `{}`", t, cut);
                }
                cut
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10 px per char, regardless of font size
    fn mono(s: &str, _font: i32) -> i32 {
        s.chars().count() as i32 * 10
    }

    #[test]
    fn test_circle_contains() {
        let c = Shape::Circle {
            center: Point::new(0.0, 0.0),
            radius: 5.0,
        };
        assert!(c.contains(Point::new(3.0, 4.0)));
        assert!(!c.contains(Point::new(4.0, 4.0)));
    }

    #[test]
    fn test_rect_contains_inclusive() {
        let r = Shape::Rect {
            pos: Point::new(10.0, 10.0),
            size: Point::new(20.0, 5.0),
        };
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(30.0, 15.0)));
        assert!(!r.contains(Point::new(9.9, 12.0)));
        assert!(!r.contains(Point::new(20.0, 15.1)));
    }

    #[test]
    fn test_triangle_contains_either_winding() {
        let (a, b, c) = (Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0));
        for tri in [Shape::Triangle { a, b, c }, Shape::Triangle { a, b: c, c: b }] {
            assert!(tri.contains(Point::new(2.0, 2.0)));
            assert!(!tri.contains(Point::new(8.0, 8.0)));
        }
    }

    #[test]
    fn test_line_and_text_not_tappable() {
        let line = Shape::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 10.0),
        };
        assert!(!line.contains(Point::new(5.0, 5.0)));
        let text = Shape::Text {
            text: "hi".to_string(),
            pos: Point::new(0.0, 0.0),
            font_size: 48,
        };
        assert!(!text.contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_truncate_to_width() {
        let measure = |s: &str| mono(s, 0);
        assert_eq!(truncate_to_width("short", 100, measure), "short");
        assert_eq!(truncate_to_width("abcdefghij", 45, measure), "abcd");
        assert_eq!(truncate_to_width("abcdefghij", 5, measure), "");
        assert_eq!(truncate_to_width("héllo wörld", 50, measure), "héllo");
    }

    #[test]
    fn test_frame_rate() {
        assert_eq!(FrameRate::target(false, false), FrameRate::STATIC);
        assert_eq!(FrameRate::target(true, false), FrameRate::ACTIVE);
        assert_eq!(FrameRate::target(false, true), FrameRate::ACTIVE);
    }

    #[test]
    fn test_controls_release_and_apply() {
        let mut controls = Controls::new(1000, 2000, 48, mono);
        let control = PlaybackControl::new();

        let play = controls.buttons()[1].area.clone();
        let Shape::Rect { pos, .. } = play else {
            panic!("play button should be a rectangle");
        };
        let inside = Point::new(pos.x + 1.0, pos.y + 1.0);

        assert_eq!(controls.release(inside), vec![Action::TogglePlay]);
        assert!(controls.apply(Action::TogglePlay, &control).unwrap());
        assert!(control.is_playing().unwrap());
        assert_eq!(controls.buttons()[1].label, Controls::PAUSE_LABEL);

        controls.apply(Action::TogglePlay, &control).unwrap();
        assert_eq!(controls.buttons()[1].label, Controls::PLAY_LABEL);

        assert!(controls.release(Point::new(-5.0, -5.0)).is_empty());
        assert!(!controls.apply(Action::Close, &control).unwrap());
        assert!(control.is_closing().unwrap());
    }

    #[test]
    fn test_track_list_rows() {
        let layout = TrackListLayout::new(1000, 2000, 10, 48);
        assert_eq!(layout.text_pad, 24);
        assert_eq!(layout.row_size, Point::new(780.0, 96.0));

        let Shape::Rect { pos, .. } = layout.row(2) else {
            panic!("rows are rectangles");
        };
        assert_eq!(pos, Point::new(110.0, 510.0 + 2.0 * 106.0));
    }

    #[test]
    fn test_truncate_all() {
        let layout = TrackListLayout::new(1000, 2000, 10, 48);
        let tracks = vec!["a.mp3".to_string(), "x".repeat(100)];
        let cut = layout.truncate_all(&tracks, mono);
        assert_eq!(cut[0], "a.mp3");
        assert_eq!(cut[1].len(), 73); // (780 - 48) / 10
    }
}
