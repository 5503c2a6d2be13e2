use signal_core::controller::{Mode, ModeController};
use signal_core::sequences::{Color, LightOutputs, NormalPhase, PEDESTRIAN_HOLD_TICKS};

/// Ticks until the controller is back at the start of green.
fn ticks_until_green(controller: &mut ModeController) -> u32 {
    let mut ticks = 0;
    loop {
        controller.tick();
        ticks += 1;
        if controller.phase() == Some(NormalPhase::Green) && controller.normal().counter() == 0 {
            return ticks;
        }
    }
}

#[test]
fn request_during_first_tick_inserts_five_tick_hold() {
    let mut controller = ModeController::new();
    let mut trace = Vec::new();

    trace.push(controller.tick());
    assert!(controller.request_pedestrian());
    for _ in 1..10 {
        trace.push(controller.tick());
    }

    assert_eq!(&trace[..3], &[LightOutputs::only(Color::Green); 3]);
    assert_eq!(trace[3], LightOutputs::only(Color::Yellow));
    assert_eq!(&trace[4..9], &[LightOutputs::pedestrian_hold(); 5]);
    assert_eq!(trace[9], LightOutputs::only(Color::Green));
    assert!(!controller.normal().pedestrian_pending());
}

#[test]
fn request_adds_exactly_the_hold_to_the_cycle() {
    let mut plain = ModeController::new();
    let baseline = ticks_until_green(&mut plain);

    let mut requested = ModeController::new();
    requested.request_pedestrian();
    let extended = ticks_until_green(&mut requested);

    assert_eq!(baseline, 6);
    assert_eq!(extended, 9);
    assert_eq!(
        extended - baseline + 2,
        u32::from(PEDESTRIAN_HOLD_TICKS),
        "red (2 ticks) is replaced by the hold"
    );
}

#[test]
fn request_during_red_waits_for_next_yellow_exit() {
    let mut controller = ModeController::new();
    for _ in 0..4 {
        controller.tick();
    }
    assert_eq!(controller.phase(), Some(NormalPhase::Red));

    controller.request_pedestrian();
    assert_eq!(controller.tick(), LightOutputs::only(Color::Red));
    assert_eq!(controller.tick(), LightOutputs::only(Color::Red));

    for _ in 0..3 {
        assert_eq!(controller.tick(), LightOutputs::only(Color::Green));
    }
    assert!(controller.normal().pedestrian_pending());
    assert_eq!(controller.tick(), LightOutputs::only(Color::Yellow));
    assert_eq!(controller.phase(), Some(NormalPhase::PedestrianHold));
    assert!(!controller.normal().pedestrian_pending());
}

#[test]
fn repeated_requests_are_served_once() {
    let mut controller = ModeController::new();
    for _ in 0..5 {
        controller.request_pedestrian();
    }

    assert_eq!(ticks_until_green(&mut controller), 9);
    assert_eq!(ticks_until_green(&mut controller), 6);
}

#[test]
fn hold_lights_red_and_yellow_only() {
    let mut controller = ModeController::new();
    controller.request_pedestrian();
    for _ in 0..4 {
        controller.tick();
    }

    for _ in 0..PEDESTRIAN_HOLD_TICKS {
        let outputs = controller.tick();
        assert!(outputs.red() && outputs.yellow() && !outputs.green());
        assert_eq!(outputs.lit_count(), 2);
    }
}

#[test]
fn requests_while_flashing_are_not_queued() {
    let mut controller = ModeController::new();
    controller.advance_mode();
    assert!(!controller.request_pedestrian());
    controller.advance_mode();
    assert!(!controller.request_pedestrian());
    controller.advance_mode();

    assert_eq!(controller.mode(), Mode::Normal);
    assert_eq!(ticks_until_green(&mut controller), 6);
}

#[test]
fn latched_request_survives_a_mode_round_trip() {
    let mut controller = ModeController::new();
    controller.request_pedestrian();
    for _ in 0..Mode::COUNT {
        controller.advance_mode();
    }

    assert!(controller.normal().pedestrian_pending());
    assert_eq!(ticks_until_green(&mut controller), 9);
}
