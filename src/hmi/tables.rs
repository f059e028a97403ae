//! Table contents shown by the systems and alarms screens.

use std::path::Path;

use crate::{
    colors::{GREY, ORANGE, RED},
    config::HMI_VERSION,
    context::AppContext,
    render::FontWeight,
    widgets::{Align, AlarmsTable, Cell, Table},
};

fn header(table: &mut Table, columns: &[(&str, u32)]) {
    let row = table.add_header(FontWeight::Bold);
    for (text, width) in columns {
        row.push(Cell::new(text, *width));
    }
}

/// Status cell for a path the HMI depends on.
fn path_status(path: &Path) -> Cell {
    if !path.as_os_str().is_empty() && path.exists() {
        Cell::new("OK", 20)
    } else {
        Cell::new("Error", 20).background(RED)
    }
}

/// Overview of the HMI build and its data sources.
pub fn system(table: &mut Table, ctx: &AppContext) {
    table.reset();
    table.set_background(ctx.theme.label_enabled.background);
    header(table, &[("Function", 80), ("Status", 20)]);

    table.add_row().push(Cell::new(&format!("HMI Version {HMI_VERSION}"), 80)).push(Cell::new("Ok", 20));
    table
        .add_row()
        .push(Cell::new(&format!("GPS Source, {}", ctx.paths.gps_device.display()), 80))
        .push(path_status(&ctx.paths.gps_device));
    table
        .add_row()
        .push(Cell::new(&format!("UK Maps, {}", ctx.paths.maps.display()), 80))
        .push(path_status(&ctx.paths.maps));
    table.add_row().push(Cell::new("Timesource GPS Lock", 80)).push(Cell::new("Off", 20).background(ORANGE));
}

const LICENCES: [(&str, &str); 6] = [
    ("Vivoe Lite", "MIT"),
    ("RTP Payloader", "MIT"),
    ("OSMScout", "LGPL"),
    ("Open Street Map", "ODbL"),
    ("Cyclone DDS", "Eclipse"),
    ("Protobuf", "BSD"),
];

/// Third-party licences.
pub fn licences(table: &mut Table, ctx: &AppContext) {
    table.reset();
    table.set_background(ctx.theme.label_enabled.background);
    header(table, &[("Software", 80), ("Licence", 20)]);
    for (software, licence) in LICENCES {
        table.add_row().push(Cell::new(software, 80)).push(Cell::new(licence, 20));
    }
}

/// Alarm status with an optional cell colour.
struct Alarm {
    time: &'static str,
    text: &'static str,
    category: &'static str,
    status: &'static str,
    colour: Option<u32>,
}

const fn alarm(time: &'static str, text: &'static str, category: &'static str, status: &'static str, colour: Option<u32>) -> Alarm {
    Alarm { time, text, category, status, colour }
}

const DEFAULT_ALARMS: [Alarm; 9] = [
    alarm("15/6 15:06", "Low engine oil pressure", "W", "RES", Some(RED)),
    alarm("15/6 15:26", "Engine over temperature", "W", "UNACK", Some(RED)),
    alarm("15/6 15:29", "Engine over temperature", "W", "RES", Some(RED)),
    alarm("15/6 14:00", "Gun fault", "C", "RES", Some(ORANGE)),
    alarm("15/6 18:16", "Air con fault", "A", "ACK", None),
    alarm("15/6 19:03", "Gun barrel over temperature", "C", "ACK(OVR)", Some(GREY)),
    alarm("15/6 19:04", "LRU xx fault", "C", "ACK", Some(ORANGE)),
    alarm("15/6 19:10", "SAS Camera 1 (Day) over temperature", "A", "ACK", None),
    alarm("15/6 19:10", "CBRN detected high CO2", "C", "ACK", Some(ORANGE)),
];

/// The alarm log shown at power-on, newest last, with a page footer.
pub fn alarms(alarms: &mut AlarmsTable, ctx: &AppContext) {
    let table = alarms.table_mut();
    table.reset();
    table.set_background(ctx.theme.table_background);
    header(table, &[("Time", 20), ("Alarm Text", 50), ("Cat", 10), ("Status", 20)]);

    for entry in &DEFAULT_ALARMS {
        let status = Cell::new(entry.status, 20);
        let row = table.add_row();
        // Overridden alarms are greyed out across the row
        if entry.colour == Some(GREY) {
            row.background = Some(GREY);
        }
        row.push(Cell::new(entry.time, 20)).push(Cell::new(entry.text, 50)).push(Cell::new(entry.category, 10));
        row.push(match entry.colour {
            Some(colour) => status.background(colour),
            None => status,
        });
    }

    table.add_row().push(Cell::new("Page 1 of 1", 100).align(Align::Right));
    table.set_current_row(1);
}
