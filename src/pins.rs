//! GPIO assignments for the door sensor board.

/// Reed switch on the fridge door, wired between this pin and 3V3.
/// The magnet on the door closes the switch, so HIGH = door closed.
/// Internal pull-down holds the line LOW when the switch is open
/// (door open, or a broken wire, which then reads as an open door).
pub const DOOR_CONTACT_GPIO: i32 = 14;
