//! Selection layer
//!
//! Sits on top of the structural layers and owns them. Positions here are the
//! positions of the layer directly beneath (the selection layer does not
//! transform coordinates). Every marker lives in the installed model.
//!
//! Out-of-bounds input is a logged no-op: single cell, row and column
//! operations outside the grid change nothing, and regions are clipped to the
//! grid (a region entirely outside is ignored).

use std::collections::BTreeSet;

use gridsel_config::SelectionSettings;
use gridsel_core::{merge_ranges, ranges_from_positions, PositionCoordinate, Range, Rectangle};

use super::default_model::DefaultSelectionModel;
use super::model::{MarkerProvider, SelectionModel};
use super::selection_model_for;
use crate::command::{LayerCommand, Modifiers};
use crate::events::{SelectionEvent, SelectionListener};
use crate::layer::{Layer, LayerEvent, RowId};

/// Rows or columns, for operations that are symmetric in the two axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Row,
    Column,
}

pub struct SelectionLayer<L> {
    underlying: L,
    model: Box<dyn SelectionModel>,
    listeners: Vec<SelectionListener>,
    hide_selected_clears_selection: bool,
}

impl<L: std::fmt::Debug> std::fmt::Debug for SelectionLayer<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionLayer")
            .field("underlying", &self.underlying)
            .field("model", &self.model)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<L: Layer> SelectionLayer<L> {
    /// Selection layer with a `DefaultSelectionModel`.
    pub fn new(underlying: L) -> Self {
        let mut model: Box<dyn SelectionModel> = Box::new(DefaultSelectionModel::new());
        model.attach(&underlying);
        Self {
            underlying,
            model,
            listeners: Vec::new(),
            hide_selected_clears_selection: false,
        }
    }

    pub fn with_settings(underlying: L, settings: &SelectionSettings) -> Self {
        let mut layer = Self::new(underlying);
        layer.set_selection_model(selection_model_for(settings));
        layer.hide_selected_clears_selection = settings.hide_selected_clears_selection;
        layer
    }

    pub fn underlying(&self) -> &L {
        &self.underlying
    }

    /// Direct access to the stack below. Changes made here must be announced
    /// with `handle_layer_event` so the selection can be repaired.
    pub fn underlying_mut(&mut self) -> &mut L {
        &mut self.underlying
    }

    pub fn selection_model(&self) -> &dyn SelectionModel {
        self.model.as_ref()
    }

    pub fn selection_model_mut(&mut self) -> &mut dyn SelectionModel {
        self.model.as_mut()
    }

    /// Install a different model. Nothing is migrated from the old one: the
    /// selection and markers are whatever the new model holds.
    pub fn set_selection_model(&mut self, mut model: Box<dyn SelectionModel>) {
        model.attach(&self.underlying);
        log::debug!(
            "selection model {} replaced by {} (rows by identity: {})",
            self.model.kind(),
            model.kind(),
            model.kind().tracks_row_identity()
        );
        self.model = model;
    }

    pub fn add_listener(&mut self, listener: SelectionListener) {
        self.listeners.push(listener);
    }

    pub(super) fn fire(&mut self, event: SelectionEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    pub(super) fn grid_rect(&self) -> Rectangle {
        Rectangle::new(0, 0, self.underlying.column_count(), self.underlying.row_count())
    }

    fn in_bounds(&self, column_position: usize, row_position: usize) -> bool {
        column_position < self.underlying.column_count()
            && row_position < self.underlying.row_count()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Plain: select only this cell. Shift: extend from the anchor to this
    /// cell, replacing the previous extension. Ctrl: toggle this cell.
    pub fn select_cell(
        &mut self,
        column_position: usize,
        row_position: usize,
        modifiers: Modifiers,
    ) {
        if !self.in_bounds(column_position, row_position) {
            log::debug!("select_cell ({column_position}, {row_position}) out of bounds, ignored");
            return;
        }
        let cell = PositionCoordinate::new(column_position, row_position);
        log::trace!("select_cell {cell:?} {modifiers:?}");

        match self.model.selection_anchor() {
            Some(anchor) if modifiers.shift => {
                self.replace_last_region(modifiers);
                let region = Rectangle::from_corners(anchor, cell);
                self.model.add_region(region);
                self.model.set_last_selected_region(Some(region));
                self.model.set_last_selected_cell(Some(cell));
            }
            _ if modifiers.ctrl && self.model.is_cell_selected(column_position, row_position) => {
                self.model.clear_cell(column_position, row_position);
                self.model.set_last_selected_region(None);
                self.relocate_anchor_if_deselected(column_position, Range::single(row_position));
            }
            _ => {
                if !modifiers.ctrl {
                    self.model.clear_selection();
                }
                self.model.add_selection(column_position, row_position);
                self.model.set_selection_anchor(Some(cell));
                self.model.set_last_selected_cell(Some(cell));
                self.model
                    .set_last_selected_region(Some(Rectangle::cell(column_position, row_position)));
            }
        }

        self.fire(SelectionEvent::Cell {
            coordinate: cell,
            modifiers,
        });
    }

    pub fn select_row(
        &mut self,
        column_position: usize,
        row_position: usize,
        modifiers: Modifiers,
    ) {
        self.select_rows(column_position, &[row_position], modifiers, Some(row_position));
    }

    /// Select whole rows. `column_position` is the column of the anchor cell;
    /// `anchor_row` picks which of the rows becomes the anchor (plain/ctrl) or
    /// the far end of the extension (shift).
    pub fn select_rows(
        &mut self,
        column_position: usize,
        row_positions: &[usize],
        modifiers: Modifiers,
        anchor_row: Option<usize>,
    ) {
        if let Some(event) =
            self.select_lines(Axis::Row, column_position, row_positions, modifiers, anchor_row)
        {
            self.fire(event);
        }
    }

    pub fn select_column(
        &mut self,
        column_position: usize,
        row_position: usize,
        modifiers: Modifiers,
    ) {
        self.select_columns(row_position, &[column_position], modifiers, Some(column_position));
    }

    /// Column counterpart of `select_rows`; `row_position` is the row of the anchor cell.
    pub fn select_columns(
        &mut self,
        row_position: usize,
        column_positions: &[usize],
        modifiers: Modifiers,
        anchor_column: Option<usize>,
    ) {
        if let Some(event) = self.select_lines(
            Axis::Column,
            row_position,
            column_positions,
            modifiers,
            anchor_column,
        ) {
            self.fire(event);
        }
    }

    /// Plain: replace the selection with the region. Shift: the selection
    /// spans from the anchor to the far side of the region, replacing the
    /// previous extension. Ctrl: append the region as its own block, or
    /// deselect it if every cell is already selected.
    pub fn select_region(&mut self, region: Rectangle, modifiers: Modifiers) {
        let Some(region) = region.intersection(&self.grid_rect()) else {
            log::debug!("select_region {region:?} outside the grid, ignored");
            return;
        };
        log::trace!("select_region {region:?} {modifiers:?}");

        match self.model.selection_anchor() {
            Some(anchor) if modifiers.shift => {
                self.replace_last_region(modifiers);
                let anchor_cell = Rectangle::cell(anchor.column_position, anchor.row_position);
                let extended = region.bounding(&anchor_cell);
                self.model.add_region(extended);
                self.model.set_last_selected_region(Some(extended));
                self.model.set_last_selected_cell(Some(opposite_corner(&extended, anchor)));
            }
            _ if modifiers.ctrl && self.all_cells_selected_in_region(region) => {
                self.model.clear_region(region);
                self.model.set_last_selected_region(None);
                self.relocate_anchor_if_deselected(region.x, region.row_range());
            }
            _ => {
                if !modifiers.ctrl {
                    self.model.clear_selection();
                }
                self.model.add_region(region);
                self.model.set_selection_anchor(Some(region.origin()));
                self.model.set_last_selected_cell(Some(region.far_corner()));
                self.model.set_last_selected_region(Some(region));
            }
        }

        self.fire(SelectionEvent::Region { region });
    }

    /// Select every visible cell. Markers are left alone and the viewport
    /// is not asked to move.
    pub fn select_all(&mut self) {
        let all = self.grid_rect();
        if !all.is_empty() {
            self.model.add_region(all);
        }
        self.fire(SelectionEvent::All);
    }

    /// Empty the selection and forget the last region. The anchor and last
    /// selected cell stay, so a following shift gesture extends from them.
    pub fn clear(&mut self) {
        self.model.clear_selection();
        self.model.set_last_selected_region(None);
        self.fire(SelectionEvent::Cleared);
    }

    /// Hide every row holding a selected cell. Returns the structural events
    /// the hide produced, as seen from this layer.
    pub fn hide_selected_rows(&mut self) -> Vec<LayerEvent> {
        let rows = self.selected_row_positions();
        if rows.is_empty() {
            return Vec::new();
        }
        let events = self
            .underlying
            .do_command(&LayerCommand::HideRows { row_positions: rows })
            .unwrap_or_else(|| {
                log::debug!("hide_selected_rows: no layer below hides rows");
                Vec::new()
            });
        for event in &events {
            self.apply_structural_change(event);
        }
        if self.hide_selected_clears_selection {
            self.clear();
        }
        events
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    pub fn is_cell_position_selected(&self, column_position: usize, row_position: usize) -> bool {
        self.in_bounds(column_position, row_position)
            && self.model.is_cell_selected(column_position, row_position)
    }

    /// Selected cells inside the grid, row-major.
    pub fn selected_cell_positions(&self) -> Vec<PositionCoordinate> {
        let grid = self.grid_rect();
        let cells: BTreeSet<(usize, usize)> = self
            .model
            .selections()
            .iter()
            .filter_map(|r| r.intersection(&grid))
            .flat_map(|r| r.cells())
            .map(|c| (c.row_position, c.column_position))
            .collect();
        cells
            .into_iter()
            .map(|(row, column)| PositionCoordinate::new(column, row))
            .collect()
    }

    /// True if the region lies inside the grid and every cell of it is selected.
    pub fn all_cells_selected_in_region(&self, region: Rectangle) -> bool {
        !region.is_empty()
            && self.grid_rect().contains_rect(&region)
            && region
                .cells()
                .all(|c| self.model.is_cell_selected(c.column_position, c.row_position))
    }

    /// Rows holding at least one selected cell, ascending.
    pub fn selected_row_positions(&self) -> Vec<usize> {
        self.selected_lines(Axis::Row)
    }

    /// Columns holding at least one selected cell, ascending.
    pub fn selected_column_positions(&self) -> Vec<usize> {
        self.selected_lines(Axis::Column)
    }

    pub fn is_row_position_fully_selected(&self, row_position: usize) -> bool {
        row_position < self.underlying.row_count()
            && self
                .model
                .is_row_fully_selected(row_position, self.underlying.column_count())
    }

    pub fn is_column_position_fully_selected(&self, column_position: usize) -> bool {
        column_position < self.underlying.column_count()
            && self
                .model
                .is_column_fully_selected(column_position, self.underlying.row_count())
    }

    pub fn fully_selected_row_positions(&self) -> Vec<usize> {
        (0..self.underlying.row_count())
            .filter(|&row| self.is_row_position_fully_selected(row))
            .collect()
    }

    pub fn fully_selected_column_positions(&self) -> Vec<usize> {
        (0..self.underlying.column_count())
            .filter(|&column| self.is_column_position_fully_selected(column))
            .collect()
    }

    pub fn selection_anchor(&self) -> Option<PositionCoordinate> {
        self.model.selection_anchor()
    }

    pub fn set_selection_anchor(&mut self, anchor: Option<PositionCoordinate>) {
        self.model.set_selection_anchor(anchor);
    }

    pub fn last_selected_cell_position(&self) -> Option<PositionCoordinate> {
        self.model.last_selected_cell()
    }

    pub fn set_last_selected_cell(&mut self, cell: Option<PositionCoordinate>) {
        self.model.set_last_selected_cell(cell);
    }

    pub fn last_selected_region(&self) -> Option<Rectangle> {
        self.model.last_selected_region()
    }

    pub fn set_last_selected_region(&mut self, region: Option<Rectangle>) {
        self.model.set_last_selected_region(region);
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Shift without ctrl replaces the block the previous gesture added.
    fn replace_last_region(&mut self, modifiers: Modifiers) {
        if modifiers.ctrl {
            return;
        }
        if let Some(previous) = self.model.last_selected_region() {
            self.model.clear_region(previous);
        }
    }

    /// After a ctrl-deselect: if the anchor no longer sits on a selected cell,
    /// move it to the nearest selected cell in `column`, searching upward from
    /// just above `rows`, then downward from just below. Failing that, use the
    /// first selected cell; with nothing selected, drop the anchor.
    pub(super) fn relocate_anchor_if_deselected(&mut self, column: usize, rows: Range) {
        let still_selected = self
            .model
            .selection_anchor()
            .is_some_and(|a| self.model.is_cell_selected(a.column_position, a.row_position));
        if still_selected {
            return;
        }

        let row_count = self.underlying.row_count();
        let anchor = (0..rows.start)
            .rev()
            .chain(rows.end..row_count)
            .find(|&row| self.model.is_cell_selected(column, row))
            .map(|row| PositionCoordinate::new(column, row))
            .or_else(|| self.selected_cell_positions().first().copied());

        log::trace!("anchor relocated to {anchor:?}");
        self.model.set_selection_anchor(anchor);
        self.model.set_last_selected_cell(anchor);
    }

    pub(super) fn apply_structural_change(&mut self, event: &LayerEvent) {
        log::debug!("repairing {} selection after {event:?}", self.model.kind());
        self.model.handle_structural_change(&self.underlying, event);
        self.fire(SelectionEvent::Structural);
    }

    fn line_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.underlying.row_count(),
            Axis::Column => self.underlying.column_count(),
        }
    }

    /// Full-length block covering `lines`.
    fn full_lines(&self, axis: Axis, lines: Range) -> Rectangle {
        match axis {
            Axis::Row => {
                Rectangle::from_ranges(Range::new(0, self.underlying.column_count()), lines)
            }
            Axis::Column => {
                Rectangle::from_ranges(lines, Range::new(0, self.underlying.row_count()))
            }
        }
    }

    /// Last cell of a line: farthest column of a row, bottom cell of a column.
    fn line_end(&self, axis: Axis, line: usize) -> PositionCoordinate {
        match axis {
            Axis::Row => {
                PositionCoordinate::new(self.underlying.column_count().saturating_sub(1), line)
            }
            Axis::Column => {
                PositionCoordinate::new(line, self.underlying.row_count().saturating_sub(1))
            }
        }
    }

    fn is_line_fully_selected(&self, axis: Axis, line: usize) -> bool {
        match axis {
            Axis::Row => self.is_row_position_fully_selected(line),
            Axis::Column => self.is_column_position_fully_selected(line),
        }
    }

    fn selected_lines(&self, axis: Axis) -> Vec<usize> {
        let grid = self.grid_rect();
        let ranges = merge_ranges(
            self.model
                .selections()
                .iter()
                .filter_map(|r| r.intersection(&grid))
                .map(|r| match axis {
                    Axis::Row => r.row_range(),
                    Axis::Column => r.column_range(),
                })
                .collect(),
        );
        ranges.iter().flat_map(Range::iter).collect()
    }

    /// Shared body of row and column selection. `fixed` is the position of the
    /// anchor cell on the other axis.
    fn select_lines(
        &mut self,
        axis: Axis,
        fixed: usize,
        positions: &[usize],
        modifiers: Modifiers,
        anchor_hint: Option<usize>,
    ) -> Option<SelectionEvent> {
        let count = self.line_count(axis);
        let cross_count = match axis {
            Axis::Row => self.underlying.column_count(),
            Axis::Column => self.underlying.row_count(),
        };
        let lines: Vec<usize> = positions.iter().copied().filter(|&p| p < count).collect();
        if lines.is_empty() || fixed >= cross_count {
            log::debug!("select {axis:?} {positions:?} at {fixed} out of bounds, ignored");
            return None;
        }
        let hint = anchor_hint.filter(|h| lines.contains(h));
        let cell_at = |line: usize| match axis {
            Axis::Row => PositionCoordinate::new(fixed, line),
            Axis::Column => PositionCoordinate::new(line, fixed),
        };
        log::trace!("select {axis:?} {lines:?} {modifiers:?}");

        let anchor = self.model.selection_anchor();
        let (affected, reveal) = match anchor {
            Some(anchor) if modifiers.shift => {
                let target = hint.unwrap_or(lines[lines.len() - 1]);
                let anchor_line = match axis {
                    Axis::Row => anchor.row_position,
                    Axis::Column => anchor.column_position,
                };
                self.replace_last_region(modifiers);
                let span = Range::new(anchor_line.min(target), anchor_line.max(target) + 1);
                let region = self.full_lines(axis, span);
                let last_cell = self.line_end(axis, target);
                self.model.add_region(region);
                self.model.set_last_selected_region(Some(region));
                self.model.set_last_selected_cell(Some(last_cell));
                (vec![span], Some(cell_at(target)))
            }
            _ if modifiers.ctrl => {
                let (deselect, select): (Vec<usize>, Vec<usize>) = lines
                    .iter()
                    .copied()
                    .partition(|&line| self.is_line_fully_selected(axis, line));
                for &line in &deselect {
                    let block = self.full_lines(axis, Range::single(line));
                    self.model.clear_region(block);
                }
                for range in ranges_from_positions(select.iter().copied()) {
                    let block = self.full_lines(axis, range);
                    self.model.add_region(block);
                }

                if let Some(&last) = select.last() {
                    let a = hint.filter(|h| select.contains(h)).unwrap_or(last);
                    let last_cell = self.line_end(axis, a);
                    let block = self.full_lines(axis, Range::single(a));
                    self.model.set_selection_anchor(Some(cell_at(a)));
                    self.model.set_last_selected_cell(Some(last_cell));
                    self.model.set_last_selected_region(Some(block));
                    (ranges_from_positions(lines.iter().copied()), Some(cell_at(a)))
                } else {
                    self.model.set_last_selected_region(None);
                    let span = Range::new(deselect[0], deselect[deselect.len() - 1] + 1);
                    match axis {
                        Axis::Row => {
                            let column = anchor.map_or(fixed, |a| a.column_position);
                            self.relocate_anchor_if_deselected(column, span);
                        }
                        Axis::Column => {
                            let rows = Range::new(0, self.underlying.row_count());
                            self.relocate_anchor_if_deselected(span.start, rows);
                        }
                    }
                    (ranges_from_positions(lines.iter().copied()), None)
                }
            }
            _ => {
                self.model.clear_selection();
                let ranges = ranges_from_positions(lines.iter().copied());
                for range in &ranges {
                    let block = self.full_lines(axis, *range);
                    self.model.add_region(block);
                }
                let a = hint.unwrap_or(lines[0]);
                // Shift replaces only the run holding the anchor
                let run = ranges
                    .iter()
                    .copied()
                    .find(|r| r.contains(a))
                    .unwrap_or_else(|| Range::single(a));
                let last_cell = self.line_end(axis, a);
                let block = self.full_lines(axis, run);
                self.model.set_selection_anchor(Some(cell_at(a)));
                self.model.set_last_selected_cell(Some(last_cell));
                self.model.set_last_selected_region(Some(block));
                (ranges, Some(cell_at(a)))
            }
        };

        Some(match axis {
            Axis::Row => SelectionEvent::Rows {
                row_positions: affected,
                reveal,
            },
            Axis::Column => SelectionEvent::Columns {
                column_positions: affected,
                reveal,
            },
        })
    }
}

/// Corner of `region` diagonally opposite the anchor corner.
fn opposite_corner(region: &Rectangle, anchor: PositionCoordinate) -> PositionCoordinate {
    let far = region.far_corner();
    let column = if anchor.column_position == region.x { far.column_position } else { region.x };
    let row = if anchor.row_position == region.y { far.row_position } else { region.y };
    PositionCoordinate::new(column, row)
}

impl<L: Layer> Layer for SelectionLayer<L> {
    fn column_count(&self) -> usize {
        self.underlying.column_count()
    }

    fn row_count(&self) -> usize {
        self.underlying.row_count()
    }

    fn row_id_at(&self, row_position: usize) -> Option<RowId> {
        self.underlying.row_id_at(row_position)
    }

    fn do_command(&mut self, command: &LayerCommand) -> Option<Vec<LayerEvent>> {
        if let Some(events) = self.handle_selection_command(command) {
            return Some(events);
        }
        let events = self.underlying.do_command(command)?;
        for event in &events {
            self.apply_structural_change(event);
        }
        Some(events)
    }

    fn handle_layer_event(&mut self, event: LayerEvent) -> Option<LayerEvent> {
        let event = self.underlying.handle_layer_event(event)?;
        self.apply_structural_change(&event);
        Some(event)
    }
}
