//! Built-in demo sessions
//!
//! Four short animations explaining the gap buffer: an introduction to
//! clustered edits, and three ways of producing the same multi-cursor edit
//! with a single cursor.

use crate::script::{Command, Script};

/// Frames per second the demos are paced for
pub const FPS: usize = 10;

/// Initial buffer capacity shared by every demo
pub const DEMO_CAPACITY: usize = 38;

/// Text the multi-cursor demos start from
const CALLS: &str = "foo(); bar(); baz();";

/// Names of the built-in demos, in render order
pub const DEMO_NAMES: &[&str] = &["intro", "multicursors", "macros", "illusion"];

fn run(text: &str) -> Command {
    Command::InsertRun(text.to_string())
}

/// Type a sentence, fix it up, then delete everything
pub fn intro() -> Script {
    use Command::*;

    Script::new(
        "intro",
        DEMO_CAPACITY,
        vec![
            Wait(FPS),
            run("This is a buffer."),
            Wait(FPS),
            Backward(7),
            run("gap "),
            // "This is a gap buffer."
            Wait(FPS),
            Backward(5),
            Wait(FPS / 2),
            Backspace(9),
            Insert('A'),
            // "A gap buffer."
            Forward(11),
            Wait(FPS / 2),
            run(" is for clustered edits"),
            Wait(FPS / 2),
            Forward(1),
            Wait(FPS),
            Backward(16),
            Backspace(24),
            Delete(1),
            Insert('C'),
            // "Clustered edits."
            Forward(14),
            run(" are most efficient!"),
            Delete(1),
            // "Clustered edits are most efficient!"
            Wait(FPS),
            Backspace(35),
            Wait(FPS),
        ],
    )
}

/// Opening shared by the multi-cursor demos: three calls, cursor inside `foo(`
fn calls_prelude() -> Vec<Command> {
    vec![
        Command::QuietInsertRun(CALLS.to_string()),
        Command::QuietMove(-16),
        Command::Wait(FPS),
    ]
}

/// The argument list typed into each call, one unit per pass
const ARGUMENT_UNITS: [char; 4] = ['x', ',', ' ', 'y'];

/// Fake three cursors by visiting each call once per typed unit
pub fn multicursors() -> Script {
    let mut commands = calls_prelude();
    for (pass, &unit) in ARGUMENT_UNITS.iter().enumerate() {
        // Distance between insertion points grows by one per pass
        let stride = 7 + pass;
        for call in 0..3 {
            commands.push(Command::Insert(unit));
            commands.push(Command::Wait(FPS / 4));
            if call < 2 {
                commands.push(Command::Forward(stride));
            }
        }
        commands.push(Command::Backward((stride + 1) * 2));
    }
    commands.push(Command::Wait(FPS * 2));
    Script::new("multicursors", DEMO_CAPACITY, commands)
}

/// Type the whole argument list into each call in turn
pub fn macros() -> Script {
    let mut commands = calls_prelude();
    for call in 0..3 {
        commands.push(run("x, y"));
        commands.push(Command::Wait(FPS / 4));
        if call < 2 {
            commands.push(Command::Forward(7));
        }
    }
    commands.push(Command::Wait(FPS * 2));
    Script::new("macros", DEMO_CAPACITY, commands)
}

/// Same edits as `multicursors`, but only the state after each pass is shown
pub fn illusion() -> Script {
    let mut commands = calls_prelude();
    for (pass, &unit) in ARGUMENT_UNITS.iter().enumerate() {
        let stride = 7 + pass as isize;
        for call in 0..3 {
            commands.push(Command::QuietInsert(unit));
            if call < 2 {
                commands.push(Command::QuietMove(stride));
            }
        }
        commands.push(Command::QuietMove(-(stride + 1) * 2));
        commands.push(Command::Wait(FPS / 4));
    }
    commands.push(Command::Wait(FPS * 2));
    Script::new("illusion", DEMO_CAPACITY, commands)
}

/// Every built-in demo, in render order
pub fn all() -> Vec<Script> {
    vec![intro(), multicursors(), macros(), illusion()]
}

/// Look up a built-in demo by name
pub fn by_name(name: &str) -> Option<Script> {
    match name {
        "intro" => Some(intro()),
        "multicursors" => Some(multicursors()),
        "macros" => Some(macros()),
        "illusion" => Some(illusion()),
        _ => None,
    }
}
