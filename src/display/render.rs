//! Panel layouts: waiting view, navigation text and zone numeral
//!
//! Every draw clears the whole frame and ends with a flush, so a panel
//! only ever shows complete frames.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_6X10, FONT_6X13_BOLD, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
    text::{Baseline, Text},
};
use heapless::String;

use crate::config::display::{
    NAV_LINE1_Y, NAV_LINE2_Y, NAV_READY_TEXT, RING_CENTER_X, RING_CENTER_Y, RING_RADIUS, RULE_Y,
    WIDTH, ZONE_GLYPH_ADVANCE, ZONE_READY_TEXT, ZONE_Y,
};
use crate::display::panel::Panel;
use crate::telemetry::wrap::ELLIPSIS;
use crate::telemetry::{NavText, TelemetrySnapshot};

const TITLE_STYLE: MonoTextStyle<'static, BinaryColor> =
    MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

/// 6 px advance: a full 20 character line spans 120 px.
const NAV_STYLE: MonoTextStyle<'static, BinaryColor> =
    MonoTextStyle::new(&FONT_6X13_BOLD, BinaryColor::On);

const NAV_ADVANCE: i32 =
    (FONT_6X13_BOLD.character_size.width + FONT_6X13_BOLD.character_spacing) as i32;

/// Ellipsis dots sit on the bottom two rows above the nav baseline.
const ELLIPSIS_DOT_Y: i32 = FONT_6X13_BOLD.baseline as i32 - 1;

/// 10x20 glyphs spread to the numeral advance.
const ZONE_FONT: MonoFont<'static> = MonoFont {
    character_spacing: ZONE_GLYPH_ADVANCE - FONT_10X20.character_size.width,
    ..FONT_10X20
};
const ZONE_STYLE: MonoTextStyle<'static, BinaryColor> =
    MonoTextStyle::new(&ZONE_FONT, BinaryColor::On);

const STROKE: PrimitiveStyle<BinaryColor> = PrimitiveStyle::with_stroke(BinaryColor::On, 1);

/// Shown on the zone panel before any zone has arrived.
const NO_ZONE_TEXT: &str = "--";

/// Left edge of a centred zone numeral with `digits` glyphs.
pub fn zone_text_x(digits: usize) -> i32 {
    let span = digits as i32 * ZONE_GLYPH_ADVANCE as i32;
    ((WIDTH as i32 - span) / 2).max(0)
}

/// Title in the top-left corner with a rule underneath.
pub fn draw_waiting<P: Panel>(panel: &mut P, title: &str) -> Result<(), P::Error> {
    panel.clear(BinaryColor::Off)?;
    Text::with_baseline(title, Point::zero(), TITLE_STYLE, Baseline::Top).draw(panel)?;
    Line::new(
        Point::new(0, RULE_Y),
        Point::new(WIDTH as i32 - 1, RULE_Y),
    )
    .into_styled(STROKE)
    .draw(panel)?;
    panel.flush()
}

/// Wrapped navigation text; the second row is skipped when empty.
pub fn draw_nav<P: Panel>(panel: &mut P, nav: &NavText) -> Result<(), P::Error> {
    panel.clear(BinaryColor::Off)?;
    draw_nav_line(panel, &nav.line1, NAV_LINE1_Y)?;
    if !nav.line2.is_empty() {
        draw_nav_line(panel, &nav.line2, NAV_LINE2_Y)?;
    }
    panel.flush()
}

/// One navigation row at top edge `y`.
///
/// The ASCII fonts have no `…` glyph, so a trailing [`ELLIPSIS`] is drawn
/// as three dots in its own character cell.
fn draw_nav_line<P: Panel>(panel: &mut P, line: &str, y: i32) -> Result<(), P::Error> {
    let (text, cut) = match line.strip_suffix(ELLIPSIS) {
        Some(text) => (text, true),
        None => (line, false),
    };
    Text::with_baseline(text, Point::new(0, y), NAV_STYLE, Baseline::Top).draw(panel)?;

    if cut {
        let cell_x = text.chars().count() as i32 * NAV_ADVANCE;
        let dots = (0..3).flat_map(|dot| {
            (0..2).map(move |row| {
                Pixel(
                    Point::new(cell_x + dot * 2, y + ELLIPSIS_DOT_Y + row),
                    BinaryColor::On,
                )
            })
        });
        panel.draw_iter(dots)?;
    }
    Ok(())
}

/// Centred zone numeral, optionally circled by the overspeed ring.
pub fn draw_zone<P: Panel>(panel: &mut P, zone: Option<u8>, ring: bool) -> Result<(), P::Error> {
    let mut digits: String<4> = String::new();
    match zone {
        Some(zone) => {
            let _ = write!(digits, "{}", zone);
        }
        None => {
            let _ = digits.push_str(NO_ZONE_TEXT);
        }
    }

    panel.clear(BinaryColor::Off)?;
    let x = zone_text_x(digits.chars().count());
    Text::with_baseline(&digits, Point::new(x, ZONE_Y), ZONE_STYLE, Baseline::Top).draw(panel)?;
    if ring {
        Circle::with_center(
            Point::new(RING_CENTER_X, RING_CENTER_Y),
            RING_RADIUS * 2 + 1,
        )
        .into_styled(STROKE)
        .draw(panel)?;
    }
    panel.flush()
}

/// What one render pass put on the glass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub nav_drawn: bool,
    pub zone_drawn: bool,
    pub ring_shown: bool,
}

/// The two HUD panels: navigation on the left, zone on the right.
pub struct HudDisplay<P: Panel> {
    nav_panel: P,
    zone_panel: P,
}

impl<P: Panel> HudDisplay<P> {
    pub fn new(nav_panel: P, zone_panel: P) -> Self {
        Self {
            nav_panel,
            zone_panel,
        }
    }

    /// Put the ready titles on both panels.
    pub fn show_waiting(&mut self) -> Result<(), P::Error> {
        draw_waiting(&mut self.nav_panel, NAV_READY_TEXT)?;
        draw_waiting(&mut self.zone_panel, ZONE_READY_TEXT)
    }

    /// Redraw both panels from a snapshot.
    ///
    /// Until the first telemetry nothing is drawn and the waiting view stays.
    /// An empty navigation text leaves the left panel as it was. A failure on
    /// one panel does not stop the other from being drawn; the first error
    /// is returned.
    pub fn render(
        &mut self,
        snapshot: &TelemetrySnapshot,
        blink_on: bool,
    ) -> Result<PassReport, P::Error> {
        let mut report = PassReport::default();
        if !snapshot.telemetry_seen {
            return Ok(report);
        }

        let nav = if snapshot.nav.is_empty() {
            Ok(())
        } else {
            report.nav_drawn = true;
            draw_nav(&mut self.nav_panel, &snapshot.nav)
        };

        report.ring_shown = snapshot.is_overspeed() && blink_on;
        report.zone_drawn = true;
        let zone = draw_zone(&mut self.zone_panel, snapshot.zone, report.ring_shown);

        nav?;
        zone?;
        Ok(report)
    }

    pub fn nav_panel(&self) -> &P {
        &self.nav_panel
    }

    pub fn zone_panel(&self) -> &P {
        &self.zone_panel
    }
}
