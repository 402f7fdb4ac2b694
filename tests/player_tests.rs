use std::fs::File;
use std::io::Write;
use std::path::Path;

use prost::Message;

use trace_replay::exchange::decode_address;
use trace_replay::player::{InstanceKind, LifecycleState, Player, PlayerConfig, Status, StatusKind};
use trace_replay::schema::{DetectedObject, SensorView};
use trace_replay::utils::config::{
    BOOLEAN_VALID_IDX, INTEGER_OBJECT_COUNT_IDX, INTEGER_OUT_BASE_HI_IDX,
    INTEGER_OUT_BASE_LO_IDX, INTEGER_OUT_SIZE_IDX, STRING_TRACE_DIR_IDX, STRING_TRACE_FILE_IDX,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_player() -> Player {
    Player::new(PlayerConfig {
        instance_name: "player-under-test".to_string(),
        kind: InstanceKind::CoSimulation,
        guid: "{00000000-0000-0000-0000-000000000001}".to_string(),
        resource_location: None,
        visible: false,
        logging_on: true,
    })
}

fn sensor_view_payload(frame_id: u64, object_count: usize) -> Vec<u8> {
    let view = SensorView {
        frame_id,
        timestamp_ns: frame_id * 40_000_000,
        objects: (0..object_count)
            .map(|i| DetectedObject {
                id: i as u64,
                x: i as f64 * 1.5,
                y: -2.0,
                heading: 0.1,
            })
            .collect(),
    };
    view.encode_to_vec()
}

fn write_binary_trace(path: &Path, payloads: &[Vec<u8>]) {
    let mut file = File::create(path).unwrap();
    for payload in payloads {
        file.write_all(&(payload.len() as u32).to_le_bytes()).unwrap();
        file.write_all(payload).unwrap();
    }
}

/// Drive a player through initialization against a trace directory.
fn initialize_with_dir(player: &mut Player, dir: &Path) {
    assert_eq!(
        player.set_string(&[STRING_TRACE_DIR_IDX], &[dir.to_str().unwrap()]),
        Status::Ok
    );
    assert_eq!(player.enter_initialization(), Status::Ok);
    assert_eq!(player.exit_initialization(), Status::Ok);
}

fn read_integer(player: &Player, vr: usize) -> i32 {
    let mut out = [0i32];
    assert_eq!(player.get_integer(&[vr], &mut out), Status::Ok);
    out[0]
}

fn read_boolean(player: &Player, vr: usize) -> bool {
    let mut out = [false];
    assert_eq!(player.get_boolean(&[vr], &mut out), Status::Ok);
    out[0]
}

#[test]
fn test_end_to_end_directory_scan() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_binary_trace(
        &dir.path().join("20240101_sv_run.osi"),
        &[
            sensor_view_payload(1, 2),
            sensor_view_payload(2, 0),
            sensor_view_payload(3, 5),
        ],
    );

    let mut player = test_player();
    initialize_with_dir(&mut player, dir.path());
    assert_eq!(player.state(), LifecycleState::Ready);

    for (step, expected_count) in [(1, 2), (2, 0), (3, 5)] {
        assert_eq!(player.step(step as f64 * 0.04, 0.04, false), Status::Ok);
        assert!(read_boolean(&player, BOOLEAN_VALID_IDX), "step {step}");
        assert_eq!(
            read_integer(&player, INTEGER_OBJECT_COUNT_IDX),
            expected_count,
            "step {step}"
        );
        assert!(read_integer(&player, INTEGER_OUT_SIZE_IDX) > 0);
        assert_eq!(
            player.retained_output(),
            sensor_view_payload(step, expected_count as usize).as_slice()
        );
    }

    // Fourth step: trace exhausted, boundary outcome, no state mutation
    assert_eq!(player.step(0.16, 0.04, false), Status::Discard);
    assert_eq!(player.state(), LifecycleState::Ready);
    assert!(read_boolean(&player, BOOLEAN_VALID_IDX));
    assert_eq!(read_integer(&player, INTEGER_OBJECT_COUNT_IDX), 5);
}

#[test]
fn test_published_buffer_readable_across_one_step() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let payloads = vec![sensor_view_payload(1, 1), sensor_view_payload(2, 2)];
    write_binary_trace(&dir.path().join("a_sv_b.osi"), &payloads);

    let mut player = test_player();
    initialize_with_dir(&mut player, dir.path());

    assert_eq!(player.step(0.0, 0.04, false), Status::Ok);
    let addr1 = decode_address(
        read_integer(&player, INTEGER_OUT_BASE_HI_IDX),
        read_integer(&player, INTEGER_OUT_BASE_LO_IDX),
    );
    let len1 = read_integer(&player, INTEGER_OUT_SIZE_IDX) as usize;
    assert_eq!(len1, payloads[0].len());

    // The next step publishes into the other buffer; the first publication
    // must still be readable at its exported address.
    assert_eq!(player.step(0.04, 0.04, false), Status::Ok);
    let bytes = unsafe { std::slice::from_raw_parts(addr1 as *const u8, len1) };
    assert_eq!(bytes, payloads[0].as_slice());
}

#[test]
fn test_file_name_override_wins_over_scan() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_binary_trace(&dir.path().join("a_sv_first.osi"), &[sensor_view_payload(1, 1)]);
    write_binary_trace(
        &dir.path().join("b_sv_second.osi"),
        &[sensor_view_payload(1, 3)],
    );

    let mut player = test_player();
    assert_eq!(
        player.set_string(&[STRING_TRACE_FILE_IDX], &["b_sv_second.osi"]),
        Status::Ok
    );
    initialize_with_dir(&mut player, dir.path());

    assert_eq!(player.step(0.0, 0.04, false), Status::Ok);
    assert_eq!(read_integer(&player, INTEGER_OBJECT_COUNT_IDX), 3);
}

#[test]
fn test_unsupported_extension_fails_at_initialization_not_step() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("trace.xyz"), b"whatever").unwrap();

    let mut player = test_player();
    player.set_string(&[STRING_TRACE_FILE_IDX], &["trace.xyz"]);
    player.set_string(&[STRING_TRACE_DIR_IDX], &[dir.path().to_str().unwrap()]);
    assert_eq!(player.enter_initialization(), Status::Ok);
    assert_eq!(player.exit_initialization(), Status::Fatal);
    assert_eq!(player.state(), LifecycleState::Faulted);
    assert_eq!(player.step(0.0, 0.04, false), Status::Fatal);
}

#[test]
fn test_empty_directory_is_fatal() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    // A file the resolver does not recognize must not be adopted by the scan
    std::fs::write(dir.path().join("notes.txt"), b"n/a").unwrap();

    let mut player = test_player();
    player.set_string(&[STRING_TRACE_DIR_IDX], &[dir.path().to_str().unwrap()]);
    assert_eq!(player.enter_initialization(), Status::Ok);
    assert_eq!(player.exit_initialization(), Status::Fatal);
}

#[test]
fn test_ground_truth_message_is_fatal_at_step() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_binary_trace(&dir.path().join("run_gt_x.osi"), &[sensor_view_payload(1, 1)]);

    let mut player = test_player();
    initialize_with_dir(&mut player, dir.path());

    assert_eq!(player.step(0.0, 0.04, false), Status::Fatal);
    assert_eq!(player.state(), LifecycleState::Faulted);
}

#[test]
fn test_batch_accessor_partial_application() {
    init_logging();
    let mut player = test_player();

    // Reference 99 is out of range: the call fails, the write before it stands
    assert_eq!(player.set_integer(&[4, 99, 5], &[41, 42, 43]), Status::Error);
    assert_eq!(read_integer(&player, 4), 41);
    assert_eq!(read_integer(&player, 5), 0);

    let mut out = [0.0f64; 2];
    assert_eq!(player.get_real(&[0, 77], &mut out), Status::Error);
}

#[test]
fn test_reset_requires_reinitialization() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_binary_trace(&dir.path().join("r_sv_t.osi"), &[sensor_view_payload(1, 2)]);

    let mut player = test_player();
    initialize_with_dir(&mut player, dir.path());
    assert_eq!(player.step(0.0, 0.04, false), Status::Ok);

    assert_eq!(player.reset(), Status::Ok);
    assert_eq!(player.state(), LifecycleState::Created);
    assert_eq!(read_integer(&player, INTEGER_OUT_SIZE_IDX), 0);
    assert!(!read_boolean(&player, BOOLEAN_VALID_IDX));

    // Stepping without a new initialization pass is rejected
    assert_eq!(player.step(0.0, 0.04, false), Status::Error);

    // A full re-initialization replays the trace from the start
    initialize_with_dir(&mut player, dir.path());
    assert_eq!(player.step(0.0, 0.04, false), Status::Ok);
    assert_eq!(read_integer(&player, INTEGER_OBJECT_COUNT_IDX), 2);
}

#[test]
fn test_boolean_status_reports_exhaustion() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    write_binary_trace(&dir.path().join("s_sv_q.osi"), &[sensor_view_payload(1, 0)]);

    let mut player = test_player();
    initialize_with_dir(&mut player, dir.path());

    assert_eq!(
        player.get_boolean_status(StatusKind::Terminated),
        (Status::Discard, false)
    );
    assert_eq!(player.step(0.0, 0.04, false), Status::Ok);
    assert_eq!(
        player.get_boolean_status(StatusKind::Terminated),
        (Status::Ok, true)
    );
}

#[test]
fn test_unsupported_capabilities_report_uniformly() {
    init_logging();
    let player = test_player();
    assert_eq!(player.get_state(), Status::Error);
    assert_eq!(player.set_state(), Status::Error);
    assert_eq!(player.serialize_state(), Status::Error);
    assert_eq!(player.deserialize_state(), Status::Error);
    assert_eq!(player.get_directional_derivative(), Status::Error);
    assert_eq!(player.set_input_derivatives(), Status::Error);
    assert_eq!(player.get_output_derivatives(), Status::Error);
    assert_eq!(player.get_status(StatusKind::DoStep), Status::Discard);
    assert_eq!(player.cancel_step(), Status::Ok);
}

#[test]
fn test_setup_and_logging_configuration_always_succeed() {
    init_logging();
    let mut player = test_player();
    assert_eq!(player.setup_experiment(Some(1e-6), 0.0, Some(10.0)), Status::Ok);
    assert_eq!(player.setup_experiment(None, 0.0, None), Status::Ok);
    assert_eq!(player.set_debug_logging(true, &["trace", "bogus"]), Status::Ok);
    assert_eq!(player.set_debug_logging(false, &[]), Status::Ok);
}
