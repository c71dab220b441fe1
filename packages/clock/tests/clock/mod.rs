use std::time::Duration;

use filemesh_clock::clock::stopped::Stopped as _;
use filemesh_clock::clock::Time;

use crate::CurrentClock;

#[test]
fn it_should_use_stopped_time_for_testing() {
    assert_eq!(CurrentClock::dbg_clock_type(), "Stopped".to_owned());

    let time = CurrentClock::now();
    std::thread::sleep(Duration::from_millis(50));
    let time_2 = CurrentClock::now();

    assert_eq!(time, time_2);
}

#[test]
fn it_should_only_move_when_told_to() {
    CurrentClock::local_set(&Duration::from_secs(10));

    assert_eq!(CurrentClock::now_sub(&Duration::from_secs(4)), Some(Duration::from_secs(6)));

    CurrentClock::local_reset();
}
