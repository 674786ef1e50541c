use rig_graph::{ConnectionRecord, LinkKind};
use rig_project::schema::*;
use rig_project::{ValidationError, standard_rig, validate_rig};

#[test]
fn standard_rig_is_valid() {
    validate_rig(&standard_rig()).unwrap();
}

#[test]
fn duplicate_device_rejected() {
    let mut rig = standard_rig();
    let dup = rig.devices[0].clone();
    rig.devices.push(dup);
    assert!(matches!(
        validate_rig(&rig),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn occupied_pipe_rejected_with_reason() {
    let mut rig = standard_rig();
    rig.connections.push(ConnectionRecord {
        from: "gaG_pipe_i".to_string(),
        to: "teT_pipe_c".to_string(),
        kind: LinkKind::Pipe,
    });
    match validate_rig(&rig) {
        Err(ValidationError::Connection { reason, .. }) => assert_eq!(reason, "terminal_occupied"),
        other => panic!("expected connection refusal, got {other:?}"),
    }
}

#[test]
fn scenario_reference_must_exist() {
    let mut rig = standard_rig();
    rig.scenario.push(StepDef::Set {
        device: "nope".to_string(),
        value: 1.0,
    });
    assert!(matches!(
        validate_rig(&rig),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn non_physical_values_rejected() {
    let mut rig = standard_rig();
    rig.devices[1].kind = DeviceKindDef::Sensor { span_bar: 0.0 };
    assert!(matches!(
        validate_rig(&rig),
        Err(ValidationError::InvalidValue { .. })
    ));

    let mut rig = standard_rig();
    rig.scenario.push(StepDef::Tick { seconds: -1.0 });
    assert!(matches!(
        validate_rig(&rig),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn future_version_rejected() {
    let mut rig = standard_rig();
    rig.version = 99;
    assert!(matches!(
        validate_rig(&rig),
        Err(ValidationError::UnsupportedVersion { version: 99 })
    ));
}
