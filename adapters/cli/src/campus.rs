//! Built-in campus used when no configuration file supplies one.

use campus_runner_core::CellCoord;
use campus_runner_system_tasks::Task;
use campus_runner_world::{CampusLayout, LayoutError};

const MAP: [&str; 18] = [
    "11111111111111111111",
    "10000011100011100001",
    "10111010101010101101",
    "10101000001000001001",
    "10101110111110111011",
    "10000000100010000001",
    "11101111101011111011",
    "10000000001000000001",
    "10111110111110111101",
    "10000010001000100001",
    "11101011101011101111",
    "10001000001000001001",
    "10111111101111111011",
    "10000000000000000001",
    "10111011111110111101",
    "10000010000010000001",
    "11111010111010111111",
    "11111111111111111111",
];

const START: (u32, u32) = (2, 15);

const BUILDINGS: [(&str, (u32, u32)); 15] = [
    ("Main Gate", (2, 15)),
    ("Admin Block", (3, 3)),
    ("DTL Innovation Hub", (6, 3)),
    ("Mechanical Dept", (11, 3)),
    ("BT Quadrangle", (7, 5)),
    ("AI-ML & MCA Dept", (14, 5)),
    ("BT & EIE Dept", (16, 7)),
    ("IEM Dept", (4, 7)),
    ("EEE Dept", (9, 7)),
    ("CSE Dept", (15, 9)),
    ("ECE Dept", (7, 11)),
    ("Library", (11, 13)),
    ("Food Court", (4, 13)),
    ("Boys Hostel", (16, 15)),
    ("Incubation Center", (13, 15)),
];

/// Builds the default campus layout with every named building registered.
pub(crate) fn layout() -> Result<CampusLayout, LayoutError> {
    let mut layout =
        CampusLayout::from_markers(&MAP)?.with_start(CellCoord::new(START.0, START.1))?;
    for (name, (column, row)) in BUILDINGS {
        layout = layout.with_building(name, CellCoord::new(column, row))?;
    }
    Ok(layout)
}

/// Errands offered on the default campus.
pub(crate) fn tasks() -> Vec<Task> {
    [
        (
            "task1",
            "First Day Orientation",
            "Admin Block",
            "Where new beginnings start, paperwork and IDs you'll get.\nFind the building where all students first met!",
            50,
            "Head to the administrative heart of the campus",
        ),
        (
            "task2",
            "Collect Syllabus",
            "BT Quadrangle",
            "For Biotech dreams, where formulas unfold,\nGet your syllabus, future stories to be told!",
            75,
            "Find the building for Biotechnology studies",
        ),
        (
            "task3",
            "AI Lab Session",
            "AI-ML & MCA Dept",
            "Where machines learn and algorithms play,\nAttend your first AI lab session today!",
            100,
            "Look for the department of Artificial Intelligence",
        ),
        (
            "task4",
            "Library Research",
            "Library",
            "Silent knowledge, books galore,\nResearch for projects, always learn more!",
            80,
            "Find the building with the most books",
        ),
        (
            "task5",
            "Lunch Break",
            "Food Court",
            "Hungry from studies, need some fuel,\nFind the place that's really cool!",
            60,
            "Time for food at the popular eating spot",
        ),
        (
            "task6",
            "Innovation Workshop",
            "DTL Innovation Hub",
            "Where ideas spark and startups grow,\nAttend a workshop, your skills to show!",
            90,
            "Visit the innovation and entrepreneurship center",
        ),
        (
            "task7",
            "Hostel Check-in",
            "Boys Hostel",
            "Day is ending, sun's going down,\nFind your room in campus town!",
            70,
            "Head to your accommodation for the night",
        ),
    ]
    .into_iter()
    .map(|(id, name, building, riddle, points, hint)| Task {
        id: id.to_owned(),
        name: name.to_owned(),
        building: building.to_owned(),
        riddle: riddle.to_owned(),
        points,
        hint: hint.to_owned(),
    })
    .collect()
}
