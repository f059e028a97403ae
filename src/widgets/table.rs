//! Tables and the widgets built on them.
//!
//! A table is a list of [`Row`]s, each a list of [`Cell`]s whose widths are
//! percentages of the table width. Rows are 19 px tall and drawn downwards
//! from the table's top edge.
//!
//! | Widget | Kind | Content |
//! |--------|------|---------|
//! | [`Table`] | `Table` | System and licence tables |
//! | [`AlarmsTable`] | `TableDynamic` | Alarm list with sort and filter |
//! | [`StatusBar`] | `StatusBar` | One-row table from the status line |
//! | [`MessageBox`] | `MessageBox` | Two-row pop-up from the screen message |

use std::any::Any;

use tracing::warn;

use super::{Frame, Placement, Widget, WidgetKind, icons, icons::Icon};
use crate::{
    colors::{WHITE, YELLOW},
    config::{MESSAGE_BOX_WIDTH, MESSAGE_BOX_Y, MINIMUM_WIDTH, STATUS_BAR_Y, TABLE_WIDTH, TABLE_X, TABLE_Y},
    render::FontWeight,
    screen::MessageIcon,
    styles::{FONT_SIZE_TABLE, text_width},
};

/// Row pitch in pixels.
pub const ROW_HEIGHT: i32 = 19;

/// Gap between a cell edge and left or right aligned text.
const CELL_PADDING: i32 = 4;

/// Alarms table top edge.
const ALARMS_Y: i32 = 46;

// =============================================================================
// Cells and Rows
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Centre,
    Right,
}

/// One table cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    /// Percentage of the table width.
    pub width: u32,
    pub align: Align,
    /// Overrides the row background.
    pub background: Option<u32>,
}

impl Cell {
    pub fn new(text: &str, width: u32) -> Self {
        Self { text: text.to_owned(), width, align: Align::Left, background: None }
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn background(mut self, rgb: u32) -> Self {
        self.background = Some(rgb);
        self
    }
}

/// One table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// `None` uses the theme's enabled label background (header rows).
    pub background: Option<u32>,
    pub foreground: u32,
    pub highlight: u32,
    pub weight: FontWeight,
    pub highlighted: bool,
}

impl Row {
    pub fn new(background: Option<u32>, weight: FontWeight) -> Self {
        Self { cells: Vec::new(), background, foreground: WHITE, highlight: YELLOW, weight, highlighted: false }
    }

    pub fn push(&mut self, cell: Cell) -> &mut Self {
        self.cells.push(cell);
        self
    }
}

/// Rows laid out at a position, ready to draw.
struct Grid<'r> {
    x: i32,
    top: i32,
    width: i32,
    rows: &'r [Row],
    current_row: usize,
    outline: u32,
    highlight: u32,
}

impl Grid<'_> {
    fn draw(&self, frame: &mut Frame<'_>) {
        let header_background = frame.ctx.theme.label_enabled.background;
        frame.line_width(1.0);

        for (index, row) in self.rows.iter().enumerate() {
            let top = self.top + index as i32 * ROW_HEIGHT;
            let baseline = top + ROW_HEIGHT - 5;
            let mut x = self.x;
            frame.font(row.weight, FONT_SIZE_TABLE);

            for cell in &row.cells {
                let width = self.width * cell.width as i32 / 100;
                frame.pipeline.set_colour_foreground(self.outline);
                frame.pipeline.set_colour_background(cell.background.or(row.background).unwrap_or(header_background));
                frame.rect(x, top, width, ROW_HEIGHT, true);

                let text = text_width(&cell.text, FONT_SIZE_TABLE) as i32;
                let pos = match cell.align {
                    Align::Left => x + CELL_PADDING,
                    Align::Centre => x + width / 2 - text / 2,
                    Align::Right => x + width - text - CELL_PADDING,
                };
                frame.pipeline.draw_colour(row.foreground);
                frame.text(pos, baseline, &cell.text);
                x += width;
            }
        }

        if self.current_row > 0 {
            frame.pipeline.set_colour_foreground(self.highlight);
            frame.rect(self.x, self.top + self.current_row as i32 * ROW_HEIGHT, self.width - 1, ROW_HEIGHT, false);
        }

        // Header rows have too few cells to count
        for (index, row) in self.rows.iter().enumerate() {
            if row.highlighted && row.cells.len() > 3 {
                frame.pipeline.set_colour_foreground(row.highlight);
                frame.rect(self.x, self.top + index as i32 * ROW_HEIGHT, self.width - 1, ROW_HEIGHT, false);
            }
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// Static table with an optional highlighted row.
#[derive(Debug)]
pub struct Table {
    kind: WidgetKind,
    placement: Placement,
    pub width: i32,
    rows: Vec<Row>,
    current_row: usize,
    background: u32,
    outline: u32,
    highlight: u32,
}

impl Table {
    pub fn new(kind: WidgetKind, background: u32) -> Self {
        Self {
            kind,
            placement: Placement::new(false, TABLE_X, TABLE_Y),
            width: TABLE_WIDTH,
            rows: Vec::new(),
            current_row: 0,
            background,
            outline: WHITE,
            highlight: YELLOW,
        }
    }

    /// Append a body row in the table background colour.
    pub fn add_row(&mut self) -> &mut Row {
        self.rows.push(Row::new(Some(self.background), FontWeight::Normal));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Append a header row in the theme's label background.
    pub fn add_header(&mut self, weight: FontWeight) -> &mut Row {
        self.rows.push(Row::new(None, weight));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Append a cell to the last row.
    pub fn add_cell(&mut self, cell: Cell) {
        match self.rows.last_mut() {
            Some(row) => {
                row.push(cell);
            }
            None => warn!(kind = ?self.kind, text = %cell.text, "no row to add a cell to"),
        }
    }

    /// Background for rows added from now on.
    pub const fn set_background(&mut self, rgb: u32) {
        self.background = rgb;
    }

    /// Drop every row and clear the selection.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.current_row = 0;
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    pub const fn current_row(&self) -> usize {
        self.current_row
    }

    pub const fn set_current_row(&mut self, row: usize) {
        self.current_row = row;
    }

    /// Move the selection down, stopping above the footer row.
    pub fn next_row(&mut self) {
        if self.current_row + 2 < self.rows.len() {
            self.current_row += 1;
        }
    }

    /// Move the selection up, stopping below the header row.
    pub const fn prev_row(&mut self) {
        if self.current_row > 1 {
            self.current_row -= 1;
        }
    }

    fn grid<'r>(&self, rows: &'r [Row]) -> Grid<'r> {
        Grid {
            x: self.placement.x,
            top: self.placement.y,
            width: self.width,
            rows,
            current_row: self.current_row,
            outline: self.outline,
            highlight: self.highlight,
        }
    }
}

impl Widget for Table {
    fn kind(&self) -> WidgetKind {
        self.kind
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        self.grid(&self.rows).draw(frame);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Alarms Table
// =============================================================================

/// Alarm list ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Unsorted,
    /// Advisories first.
    Ascending,
    /// Warnings first.
    Descending,
}

/// Category column of an alarm row.
const CATEGORY_CELL: usize = 2;

/// Status column of an alarm row.
const STATUS_CELL: usize = 3;

/// Severity rank of a category, most severe lowest.
fn category_rank(row: &Row) -> u8 {
    match row.cells.get(CATEGORY_CELL).map(|c| c.text.as_str()) {
        Some("W") => 0,
        Some("C") => 1,
        Some("A") => 2,
        _ => 3,
    }
}

/// Rows with a full set of columns are alarms; the rest are header or footer.
fn is_alarm(row: &Row) -> bool {
    row.cells.len() > STATUS_CELL
}

fn is_overridden(row: &Row) -> bool {
    row.cells.get(STATUS_CELL).is_some_and(|c| c.text.contains("OVR"))
}

/// Alarm table that can sort by category, hide overridden alarms and
/// highlight every alarm.
///
/// The stored rows are never reordered; each draw builds a filtered, sorted
/// copy. The header stays first and non-alarm rows (the page footer) stay last.
#[derive(Debug)]
pub struct AlarmsTable {
    table: Table,
    sort: SortOrder,
    hide_override: bool,
    highlight_all: bool,
}

impl AlarmsTable {
    pub fn new(background: u32) -> Self {
        let mut table = Table::new(WidgetKind::TableDynamic, background);
        table.placement.y = ALARMS_Y;
        table.current_row = 1;
        Self { table, sort: SortOrder::Unsorted, hide_override: false, highlight_all: false }
    }

    pub const fn table(&self) -> &Table {
        &self.table
    }

    pub const fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    #[inline]
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    pub const fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    #[inline]
    pub const fn hide_override(&self) -> bool {
        self.hide_override
    }

    pub const fn set_hide_override(&mut self, hide: bool) {
        self.hide_override = hide;
    }

    #[inline]
    pub const fn highlight_all(&self) -> bool {
        self.highlight_all
    }

    /// Mark every row but the header as highlighted (or clear the marks).
    pub fn set_highlight_all(&mut self, highlight: bool) {
        self.highlight_all = highlight;
        for row in self.table.rows.iter_mut().skip(1) {
            row.highlighted = highlight;
        }
    }

    /// Rows as they will be drawn.
    pub fn visible_rows(&self) -> Vec<Row> {
        let Some((header, rest)) = self.table.rows.split_first() else {
            return Vec::new();
        };
        let (mut alarms, trailing): (Vec<&Row>, Vec<&Row>) =
            rest.iter().filter(|row| !(self.hide_override && is_overridden(row))).partition(|row| is_alarm(row));
        match self.sort {
            SortOrder::Unsorted => {}
            SortOrder::Descending => alarms.sort_by_key(|row| category_rank(row)),
            SortOrder::Ascending => alarms.sort_by_key(|row| std::cmp::Reverse(category_rank(row))),
        }
        std::iter::once(header).chain(alarms).chain(trailing).cloned().collect()
    }

    pub fn next_row(&mut self) {
        let rows = self.visible_rows().len();
        if self.table.current_row + 2 < rows {
            self.table.current_row += 1;
        }
    }

    pub const fn prev_row(&mut self) {
        self.table.prev_row();
    }
}

impl Widget for AlarmsTable {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TableDynamic
    }

    fn placement(&self) -> &Placement {
        &self.table.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.table.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let rows = self.visible_rows();
        self.table.grid(&rows).draw(frame);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Status Bar
// =============================================================================

/// Column widths in percent.
const STATUS_WIDTHS: [u32; 7] = [23, 8, 37, 8, 8, 8, 8];

/// Clock, location and alarm counts along the top of the screen.
#[derive(Debug)]
pub struct StatusBar {
    placement: Placement,
}

impl StatusBar {
    pub const fn new() -> Self {
        Self { placement: Placement::new(true, 1, STATUS_BAR_Y) }
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar {
    fn kind(&self) -> WidgetKind {
        WidgetKind::StatusBar
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let status = &frame.screen.status;
        let texts = [
            status.clock.clone(),
            status.format.label().to_owned(),
            status.location.clone(),
            format!("W:{}", status.warnings),
            format!("A:{}", status.advisories),
            format!("C:{}", status.cautions),
            format!("O:{}", status.overrides),
        ];
        let mut row = Row::new(None, FontWeight::Normal);
        for (text, width) in texts.iter().zip(STATUS_WIDTHS) {
            row.push(Cell::new(text, width));
        }
        let rows = [row];
        Grid {
            x: self.placement.x,
            top: self.placement.y,
            width: MINIMUM_WIDTH as i32,
            rows: &rows,
            current_row: 0,
            outline: WHITE,
            highlight: YELLOW,
        }
        .draw(frame);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Message Box
// =============================================================================

/// Centred two-row pop-up showing the screen message.
#[derive(Debug)]
pub struct MessageBox {
    placement: Placement,
}

impl MessageBox {
    pub const fn new() -> Self {
        Self { placement: Placement::new(true, MINIMUM_WIDTH as i32 / 2 - MESSAGE_BOX_WIDTH / 2, MESSAGE_BOX_Y) }
    }
}

impl Default for MessageBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for MessageBox {
    fn kind(&self) -> WidgetKind {
        WidgetKind::MessageBox
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let message = &frame.screen.message;
        if !message.visible {
            return;
        }
        let background = frame.ctx.theme.label_enabled.background;
        let mut title = Row::new(Some(background), FontWeight::Bold);
        title.push(Cell::new(&message.brief, 100).align(Align::Centre));
        let mut detail = Row::new(Some(background), FontWeight::Normal);
        detail.push(Cell::new(&message.detail, 100).align(Align::Centre));
        let rows = [title, detail];

        let (x, top) = (self.placement.x, self.placement.y);
        Grid { x, top, width: MESSAGE_BOX_WIDTH, rows: &rows, current_row: 0, outline: WHITE, highlight: YELLOW }
            .draw(frame);

        let icon = match message.icon {
            MessageIcon::Info => Icon::Info,
            MessageIcon::Warning => Icon::Warning,
            MessageIcon::Error => Icon::Error,
        };
        let centre = (x + MESSAGE_BOX_WIDTH - 17) as f32;
        icons::draw(frame.pipeline, icon, centre, Frame::row(top + ROW_HEIGHT / 2), 11.0, 11.0);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
