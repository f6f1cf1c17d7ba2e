//! Text rendering of the board. The surface keeps a model of every mounted
//! slot and prints it on demand.

use std::{
    cell::RefCell,
    io::{self, Write},
};

use chrono::Duration;
use client_core::TripInfo;
use presenter::view::{
    BusyIndicator, Component, EmptyMessage, FilterBar, FormState, NewPointButton, PointForm,
    PointRow, Position, Slot, SortBar, Surface,
};
use shared::domain::PointId;
use tracing::debug;

#[derive(Debug, Default)]
struct Screen {
    filters: Option<FilterBar>,
    trip_info: Option<TripInfo>,
    sort: Option<SortBar>,
    message: Option<EmptyMessage>,
    new_point: Option<PointForm>,
    rows: Vec<(PointId, Component)>,
    busy: bool,
    new_point_disabled: bool,
    shaken: Vec<Slot>,
}

#[derive(Debug, Default)]
pub struct TerminalSurface {
    screen: RefCell<Screen>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the 0-based row as currently drawn.
    pub fn row_id(&self, index: usize) -> Option<PointId> {
        self.screen
            .borrow()
            .rows
            .get(index)
            .map(|(id, _)| id.clone())
    }

    pub fn is_new_point_disabled(&self) -> bool {
        self.screen.borrow().new_point_disabled
    }

    /// Prints the board. Pending shake cues are shown once and then cleared.
    pub fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        let mut screen = self.screen.borrow_mut();

        if let Some(filters) = &screen.filters {
            let items: Vec<String> = filters
                .items
                .iter()
                .map(|item| {
                    format!(
                        "{} {} ({}){}",
                        mark(item.checked),
                        item.filter.as_str(),
                        item.count,
                        if item.disabled { " -" } else { "" }
                    )
                })
                .collect();
            writeln!(out, "filter: {}", items.join("  "))?;
        }
        if let Some(info) = &screen.trip_info {
            writeln!(
                out,
                "{}  {} — {}  total €{}",
                info.title,
                info.date_from.format("%b %d"),
                info.date_to.format("%b %d"),
                info.total_cost
            )?;
        }
        let new_point = if screen.new_point_disabled {
            "[new event: disabled]"
        } else {
            "[new event]"
        };
        writeln!(out, "{new_point}")?;
        if let Some(sort) = &screen.sort {
            let items: Vec<String> = sort
                .items
                .iter()
                .map(|item| {
                    format!(
                        "{} {}{}",
                        mark(item.checked),
                        item.sort.as_str(),
                        if item.disabled { " -" } else { "" }
                    )
                })
                .collect();
            writeln!(out, "sort: {}", items.join("  "))?;
        }
        if let Some(form) = &screen.new_point {
            write_form(out, form, screen.shaken.contains(&Slot::NewPoint))?;
        }
        if let Some(message) = screen.message {
            writeln!(out, "{}", message.text())?;
        }
        for (index, (id, component)) in screen.rows.iter().enumerate() {
            let shaken = screen.shaken.contains(&Slot::Point(id.clone()));
            match component {
                Component::Row(row) => write_row(out, index + 1, row, shaken)?,
                Component::Form(form) => {
                    writeln!(out, "{:>3}.", index + 1)?;
                    write_form(out, form, shaken)?;
                }
                _ => {}
            }
        }
        if screen.busy {
            writeln!(out, "... working")?;
        }
        screen.shaken.clear();
        Ok(())
    }
}

fn mark(checked: bool) -> &'static str {
    if checked {
        "(x)"
    } else {
        "( )"
    }
}

fn write_row(out: &mut impl Write, number: usize, row: &PointRow, shaken: bool) -> io::Result<()> {
    let favorite = if row.is_favorite { "★" } else { " " };
    write!(
        out,
        "{number:>3}. {favorite} {}  {} {}  {} — {} ({})  €{}",
        row.date_from.format("%b %d"),
        row.kind.label(),
        row.destination_name,
        row.date_from.format("%H:%M"),
        row.date_to.format("%H:%M"),
        format_duration(row.duration),
        row.base_price
    )?;
    for offer in &row.offers {
        write!(out, "  + {} €{}", offer.title, offer.price)?;
    }
    if shaken {
        write!(out, "  <!>")?;
    }
    writeln!(out)
}

fn write_form(out: &mut impl Write, form: &PointForm, shaken: bool) -> io::Result<()> {
    let draft = &form.draft;
    let title = if form.is_new { "new point" } else { "edit point" };
    let status = match form.state {
        FormState { is_saving: true, .. } => " [saving...]",
        FormState { is_deleting: true, .. } => " [deleting...]",
        FormState { is_disabled: true, .. } => " [disabled]",
        _ => "",
    };
    writeln!(out, "     ┌ {title}{status}{}", if shaken { "  <!>" } else { "" })?;
    writeln!(out, "     │ type: {}", draft.kind.as_str())?;
    let destination = form
        .destination
        .as_ref()
        .map(|city| city.name.as_str())
        .unwrap_or("-");
    writeln!(
        out,
        "     │ destination: {destination}  (one of: {})",
        form.destination_names.join(", ")
    )?;
    if let Some(city) = &form.destination {
        if !city.description.is_empty() {
            writeln!(out, "     │   {}", city.description)?;
        }
    }
    writeln!(
        out,
        "     │ from: {}  to: {}",
        draft.date_from.format("%d/%m/%y %H:%M"),
        draft.date_to.format("%d/%m/%y %H:%M")
    )?;
    writeln!(out, "     │ price: €{}", draft.base_price)?;
    for offer in &form.available_offers {
        let checked = draft.offers.contains(&offer.id);
        writeln!(
            out,
            "     │ {} {} ({}) €{}",
            mark(checked),
            offer.title,
            offer.id,
            offer.price
        )?;
    }
    writeln!(out, "     └")
}

/// `01D 02H 05M`, dropping leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let days = minutes / (24 * 60);
    let hours = minutes / 60 % 24;
    let minutes = minutes % 60;
    if days > 0 {
        format!("{days:02}D {hours:02}H {minutes:02}M")
    } else if hours > 0 {
        format!("{hours:02}H {minutes:02}M")
    } else {
        format!("{minutes:02}M")
    }
}

impl Screen {
    fn put(&mut self, slot: Slot, component: Component, position: Option<Position>) {
        match (slot, component) {
            (Slot::Filters, Component::Filters(bar)) => self.filters = Some(bar),
            (Slot::TripInfo, Component::TripInfo(info)) => self.trip_info = Some(info),
            (Slot::Sort, Component::Sort(bar)) => self.sort = Some(bar),
            (Slot::Loading | Slot::EmptyMessage, Component::Empty(message)) => {
                self.message = Some(message)
            }
            (Slot::NewPoint, Component::Form(form)) => self.new_point = Some(form),
            (Slot::Point(id), component) => {
                if let Some(entry) = self.rows.iter_mut().find(|(existing, _)| *existing == id) {
                    entry.1 = component;
                    return;
                }
                match position {
                    Some(Position::Start) => self.rows.insert(0, (id, component)),
                    _ => self.rows.push((id, component)),
                }
            }
            (slot, component) => debug!(?slot, ?component, "component does not fit slot"),
        }
    }
}

impl Surface for TerminalSurface {
    fn mount(&self, slot: Slot, component: Component, position: Position) {
        self.screen.borrow_mut().put(slot, component, Some(position));
    }

    fn replace(&self, slot: Slot, component: Component) {
        self.screen.borrow_mut().put(slot, component, None);
    }

    fn update_form(&self, slot: &Slot, state: FormState) {
        let mut screen = self.screen.borrow_mut();
        let form = match slot {
            Slot::NewPoint => screen.new_point.as_mut(),
            Slot::Point(id) => screen
                .rows
                .iter_mut()
                .find(|(existing, _)| existing == id)
                .and_then(|(_, component)| match component {
                    Component::Form(form) => Some(form),
                    _ => None,
                }),
            _ => None,
        };
        if let Some(form) = form {
            form.state = state;
        }
    }

    fn remove(&self, slot: &Slot) {
        let mut screen = self.screen.borrow_mut();
        match slot {
            Slot::Filters => screen.filters = None,
            Slot::TripInfo => screen.trip_info = None,
            Slot::Sort => screen.sort = None,
            Slot::Loading | Slot::EmptyMessage => screen.message = None,
            Slot::NewPoint => screen.new_point = None,
            Slot::Point(id) => screen.rows.retain(|(existing, _)| existing != id),
        }
    }

    fn shake(&self, slot: &Slot) {
        self.screen.borrow_mut().shaken.push(slot.clone());
    }
}

impl BusyIndicator for TerminalSurface {
    fn show(&self) {
        self.screen.borrow_mut().busy = true;
    }

    fn hide(&self) {
        self.screen.borrow_mut().busy = false;
    }
}

impl NewPointButton for TerminalSurface {
    fn set_disabled(&self, disabled: bool) {
        self.screen.borrow_mut().new_point_disabled = disabled;
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
