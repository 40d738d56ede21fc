//! End-to-end display tests against the panel model.

use proptest::prelude::*;
use tftlink_core::sim::{PanelModel, RecordingSink};
use tftlink_core::{DisplayGeometry, GlyphSource, Link, LinkConfig, Palette, Rect, Rgb565};
use tftlink_display::{ButtonConfig, DisplayBackend, GlyphBitmap, Icon, TftDisplay};
use tftlink_protocol::{frames, reg, Frame};

const GEOMETRY: DisplayGeometry = DisplayGeometry::new(160, 96);

/// Glyph rows derived from the character code, so every character differs
struct CodeFont {
    glyphs: Vec<[u8; 14]>,
}

impl CodeFont {
    fn new() -> Self {
        let glyphs = (0..=255u8)
            .map(|code| {
                let mut rows = [0u8; 14];
                for (i, row) in rows.iter_mut().enumerate() {
                    *row = code.rotate_left(i as u32) ^ (i as u8);
                }
                rows
            })
            .collect();
        Self { glyphs }
    }
}

impl GlyphSource for CodeFont {
    fn glyph(&self, code: u8) -> &[u8] {
        &self.glyphs[usize::from(code)]
    }
}

fn display() -> TftDisplay<RecordingSink, CodeFont> {
    let link = Link::new(RecordingSink::new(), 5, LinkConfig::default(), GEOMETRY).unwrap();
    let buttons = [
        ButtonConfig {
            rect: Rect::new(0, 80, 40, 96),
            palette: Palette::new(Rgb565(0xF800), Rgb565(0x0000)),
            glyph: GlyphBitmap::new(8, 8, vec![0x18; 8]).unwrap(),
        },
        ButtonConfig {
            rect: Rect::new(120, 80, 160, 96),
            palette: Palette::new(Rgb565(0x07E0), Rgb565(0x001F)),
            glyph: GlyphBitmap::new(12, 4, vec![0xFF, 0xF0, 0x80, 0x10, 0x80, 0x10, 0xFF, 0xF0])
                .unwrap(),
        },
    ];
    TftDisplay::new(
        link,
        Rect::new(0, 8, 160, 72),
        Palette::new(Rgb565::WHITE, Rgb565(0x0010)),
        CodeFont::new(),
        buttons,
    )
    .unwrap()
}

fn replay_all(display: &mut TftDisplay<RecordingSink, CodeFont>, panel: &mut PanelModel) {
    panel.apply_sink(display.link_mut().sink_mut()).unwrap();
}

#[test]
fn init_paints_everything_and_turns_display_on() {
    let mut display = display();
    let mut panel = PanelModel::new(GEOMETRY);
    display.init();
    replay_all(&mut display, &mut panel);

    assert!(panel.is_display_on());
    assert!(panel.shows(display.menu()));
    for button in display.buttons() {
        assert!(panel.shows(button.grid()));
    }
    // Area outside menu and buttons holds the cleared background
    assert_eq!(panel.pixel(80, 2), Some(Rgb565(0x0010)));
    assert_eq!(panel.pixel(80, 90), Some(Rgb565(0x0010)));
}

#[test]
fn init_ends_with_display_on() {
    let mut display = display();
    display.init();

    let requests = display.link().sink().requests();
    let last = requests.last().unwrap();
    assert_eq!(last.channel, 5);
    let frames: Vec<Frame<'_>> = frames(&last.bytes).map(|f| f.unwrap()).collect();
    assert_eq!(frames.last(), Some(&Frame::Command(&[reg::DISPON])));
}

#[test]
fn bring_up_commands_are_sent_verbatim() {
    let mut display = display();
    let madctl = [reg::MADCTL, 0x20];
    let colmod = [reg::COLMOD, 0x55];
    display.send_commands([&[reg::SWRESET][..], &madctl[..], &colmod[..]]);

    let sink = display.link().sink();
    assert_eq!(sink.len(), 1);
    assert_eq!(
        sink.requests()[0].bytes,
        [0, reg::SWRESET, 1, reg::MADCTL, 0x20, 1, reg::COLMOD, 0x55]
    );
}

#[test]
fn menu_updates_only_touch_the_menu() {
    let mut display = display();
    let mut panel = PanelModel::new(GEOMETRY);
    display.init();
    replay_all(&mut display, &mut panel);

    display.write_text(2, 1, b"Clean 42");
    display
        .set_icon(Icon::from_rows("fan", [0xA5A5; 16]).unwrap())
        .unwrap();
    assert_eq!(display.write_glyph(12, 2, "fan"), 2);
    assert_eq!(display.write_glyph(15, 2, "degrees"), 1);
    display.write_graphics(0, 3, &[0x80; 16]);

    let stats = display.flush();
    assert!(stats.ranges > 0);
    replay_all(&mut display, &mut panel);
    assert!(panel.shows(display.menu()));
    for button in display.buttons() {
        assert!(panel.shows(button.grid()));
    }

    // Nothing changed since
    let stats = display.flush();
    assert_eq!(stats.requests, 0);
}

#[test]
fn clear_then_flush_restores_background() {
    let mut display = display();
    let mut panel = PanelModel::new(GEOMETRY);
    display.init();
    display.write_text(0, 0, b"Hello");
    display.flush();

    display.clear();
    display.flush();
    replay_all(&mut display, &mut panel);

    for y in 8..72 {
        for x in 0..160 {
            assert_eq!(panel.pixel(x, y), Some(Rgb565(0x0010)));
        }
    }
}

proptest! {
    /// Random text edits always leave the panel showing the menu.
    #[test]
    fn text_edits_reach_the_panel(
        edits in proptest::collection::vec((0usize..22, 0usize..5, "[ -~]{0,12}"), 1..10),
    ) {
        let mut display = display();
        let mut panel = PanelModel::new(GEOMETRY);
        display.init();

        for (col, line, text) in &edits {
            display.write_text(*col, *line, text.as_bytes());
            display.flush();
            replay_all(&mut display, &mut panel);
            prop_assert!(panel.shows(display.menu()));
        }
    }
}
