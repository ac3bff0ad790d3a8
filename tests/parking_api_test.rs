// ==========================================
// ParkingApi integration tests
// ==========================================
// Scope:
// 1. vehicle registration (plates, bicycles, required fields)
// 2. entry/exit reconciliation (one log per vehicle per day)
// 3. audited correction of vehicle + log
// 4. capacities and occupancy
// ==========================================

mod helpers;

use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::*;
use parking_occupancy::domain::{LogPatch, ParkingConfig, VehiclePatch, VehicleType};
use parking_occupancy::ApiError;

// ==========================================
// Registration
// ==========================================

#[tokio::test]
async fn test_register_vehicle_uppercases_plate_and_records_registrant() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;

    let vehicle = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car(" abc1d23 ").build())
        .await
        .unwrap();

    assert_eq!(vehicle.plate, "ABC1D23");
    assert_eq!(vehicle.registered_by, "admin@campus.br");
    assert!(vehicle.edit_history.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_plate_is_refused() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;

    env.parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("ABC1D23").build())
        .await
        .unwrap();
    let err = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("abc1d23").owner("Outro").build())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_register_bicycles_get_distinct_tokens() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;

    let first = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::bicycle().build())
        .await
        .unwrap();
    let second = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::bicycle().build())
        .await
        .unwrap();

    assert!(first.plate.starts_with("BICI-"));
    assert!(second.plate.starts_with("BICI-"));
    assert_ne!(first.plate, second.plate);
}

#[tokio::test]
async fn test_register_missing_fields_is_validation_error() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;

    let err = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("").model("").build())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
}

// ==========================================
// Reconciliation
// ==========================================

#[tokio::test]
async fn test_save_log_twice_same_day_keeps_one_record() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let operator = env.operator("op1").await;
    let vehicle = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("QWE4R56").build())
        .await
        .unwrap();
    let day = date(2024, 3, 4);

    let created = env
        .parking_api
        .save_log(&admin, &entry_write(&vehicle.id, day, 8, 0))
        .await
        .unwrap();

    let mut exit = entry_write(&vehicle.id, day, 8, 0);
    exit.exit_time = Some(time(12, 30));
    let updated = env.parking_api.save_log(&operator, &exit).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.exit_time, Some(time(12, 30)));
    assert_eq!(updated.operator_name, "op1@campus.br");

    let daily = env.report_api.daily_logs(day, None).await.unwrap();
    assert_eq!(daily.len(), 1);
}

#[tokio::test]
async fn test_save_log_unknown_vehicle_is_not_found() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;

    let err = env
        .parking_api
        .save_log(&admin, &entry_write("ghost", date(2024, 3, 4), 8, 0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "NotFoundError");
}

#[tokio::test]
async fn test_quick_exit_closes_open_stay() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let vehicle = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::motorcycle("MOT0A11").build())
        .await
        .unwrap();
    let day = date(2024, 3, 5);
    let log = env
        .parking_api
        .save_log(&admin, &entry_write(&vehicle.id, day, 7, 45))
        .await
        .unwrap();

    assert_eq!(env.parking_api.active_entries(day, None).await.unwrap().len(), 1);

    let closed = env.parking_api.quick_exit(&admin, &log.id, time(11, 0)).await.unwrap();
    assert_eq!(closed.exit_time, Some(time(11, 0)));
    assert_eq!(closed.entry_time, time(7, 45));
    assert!(env.parking_api.active_entries(day, None).await.unwrap().is_empty());
}

// ==========================================
// Audited correction
// ==========================================

#[tokio::test]
async fn test_edit_records_history_and_propagates_plate() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let vehicle = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("OLD1A23").color("Vermelho").build())
        .await
        .unwrap();
    let log = env
        .parking_api
        .save_log(&admin, &entry_write(&vehicle.id, date(2024, 4, 1), 9, 0))
        .await
        .unwrap();

    let vehicle_patch = VehiclePatch {
        plate: Some("NEW9Z87".to_string()),
        color: Some("Azul".to_string()),
        ..Default::default()
    };
    let log_patch = LogPatch {
        exit_time: Some(Some(time(18, 0))),
        ..Default::default()
    };

    let edit = env
        .parking_api
        .update_log_and_vehicle(&admin, &vehicle.id, &log.id, &vehicle_patch, &log_patch)
        .await
        .unwrap();
    assert_eq!(edit.entry_count(), 3);

    let history = env.parking_api.vehicle_history(&vehicle.id).await.unwrap();
    let fields: Vec<&str> = history.iter().map(|h| h.field.as_str()).collect();
    assert!(fields.contains(&"Placa"));
    assert!(fields.contains(&"Cor"));

    let log_history = env.parking_api.log_history(&log.id).await.unwrap();
    assert_eq!(log_history.len(), 1);
    assert_eq!(log_history[0].field, "Saída");
    assert_eq!(log_history[0].old_value, "");
    assert_eq!(log_history[0].new_value, "18:00");

    let daily = env.report_api.daily_logs(date(2024, 4, 1), None).await.unwrap();
    assert_eq!(daily[0].log.plate, "NEW9Z87");
    assert_eq!(daily[0].vehicle.plate, "NEW9Z87");
}

#[tokio::test]
async fn test_edit_cannot_take_another_vehicles_plate() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    env.parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("AAA1A11").build())
        .await
        .unwrap();
    let second = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("BBB2B22").build())
        .await
        .unwrap();
    let log = env
        .parking_api
        .save_log(&admin, &entry_write(&second.id, date(2024, 4, 2), 8, 0))
        .await
        .unwrap();

    for plate in ["aaa1a11", "AAA1A11"] {
        let patch = VehiclePatch {
            plate: Some(plate.to_string()),
            ..Default::default()
        };
        let err = env
            .parking_api
            .update_log_and_vehicle(&admin, &second.id, &log.id, &patch, &LogPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    let blank_owner = VehiclePatch {
        owner_name: Some("  ".to_string()),
        ..Default::default()
    };
    let err = env
        .parking_api
        .update_log_and_vehicle(&admin, &second.id, &log.id, &blank_owner, &LogPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");

    let matches = env.report_api.search_vehicles(Some("AAA1A11")).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert!(env.parking_api.vehicle_history(&second.id).await.unwrap().is_empty());

    let lower_case = VehiclePatch {
        plate: Some(" ccc3c33 ".to_string()),
        ..Default::default()
    };
    env.parking_api
        .update_log_and_vehicle(&admin, &second.id, &log.id, &lower_case, &LogPatch::default())
        .await
        .unwrap();
    let daily = env.report_api.daily_logs(date(2024, 4, 2), None).await.unwrap();
    assert_eq!(daily[0].vehicle.plate, "CCC3C33");
    assert_eq!(daily[0].log.plate, "CCC3C33");
}

#[tokio::test]
async fn test_update_vehicle_alone_is_audited_and_checked() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    env.parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::motorcycle("MOT1O11").build())
        .await
        .unwrap();
    let car = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("CAR2C22").color("Prata").build())
        .await
        .unwrap();

    let taken = VehiclePatch {
        plate: Some("mot1o11".to_string()),
        ..Default::default()
    };
    let err = env
        .parking_api
        .update_vehicle(&admin, &car.id, &taken)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");

    let recolor = VehiclePatch {
        color: Some("Grafite".to_string()),
        ..Default::default()
    };
    let updated = env
        .parking_api
        .update_vehicle(&admin, &car.id, &recolor)
        .await
        .unwrap();
    assert_eq!(updated.color, "Grafite");

    let history = env.parking_api.vehicle_history(&car.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].field, "Cor");
    assert_eq!(history[0].old_value, "Prata");

    let missing = env
        .parking_api
        .update_vehicle(&admin, "ghost", &recolor)
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), "NotFoundError");
}

#[tokio::test]
async fn test_edit_without_changes_writes_nothing() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let vehicle = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("SAM3E11").color("Cinza").build())
        .await
        .unwrap();
    let log = env
        .parking_api
        .save_log(&admin, &entry_write(&vehicle.id, date(2024, 4, 2), 9, 0))
        .await
        .unwrap();

    let same = VehiclePatch {
        color: Some("Cinza".to_string()),
        ..Default::default()
    };
    let edit = env
        .parking_api
        .update_log_and_vehicle(&admin, &vehicle.id, &log.id, &same, &LogPatch::default())
        .await
        .unwrap();

    assert!(edit.is_noop());
    assert!(env.parking_api.vehicle_history(&vehicle.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_moving_log_onto_taken_date_is_refused() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let vehicle = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("DUP1D00").build())
        .await
        .unwrap();
    let monday = env
        .parking_api
        .save_log(&admin, &entry_write(&vehicle.id, date(2024, 4, 8), 8, 0))
        .await
        .unwrap();
    env.parking_api
        .save_log(&admin, &entry_write(&vehicle.id, date(2024, 4, 9), 8, 0))
        .await
        .unwrap();

    let move_to_tuesday = LogPatch {
        date: Some(date(2024, 4, 9)),
        ..Default::default()
    };
    let err = env
        .parking_api
        .update_log_and_vehicle(
            &admin,
            &vehicle.id,
            &monday.id,
            &VehiclePatch::default(),
            &move_to_tuesday,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
}

#[tokio::test]
async fn test_edit_log_of_other_vehicle_is_refused() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let a = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("AAA1A11").build())
        .await
        .unwrap();
    let b = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("BBB2B22").build())
        .await
        .unwrap();
    let log_b = env
        .parking_api
        .save_log(&admin, &entry_write(&b.id, date(2024, 4, 10), 8, 0))
        .await
        .unwrap();

    let err = env
        .parking_api
        .update_log_and_vehicle(
            &admin,
            &a.id,
            &log_b.id,
            &VehiclePatch {
                color: Some("Verde".to_string()),
                ..Default::default()
            },
            &LogPatch::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
}

// ==========================================
// Capacities and occupancy
// ==========================================

#[tokio::test]
async fn test_default_capacities_and_admin_only_update() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let operator = env.operator("op2").await;

    assert_eq!(env.parking_api.parking_config().await.unwrap(), ParkingConfig::default());

    let new_config = ParkingConfig {
        total_car_spots: 3,
        total_motorcycle_spots: 2,
        total_bicycle_spots: 1,
    };
    let err = env.parking_api.save_config(&operator, &new_config).await.unwrap_err();
    assert_eq!(err.kind(), "AuthorizationError");

    env.parking_api.save_config(&admin, &new_config).await.unwrap();
    assert_eq!(env.parking_api.parking_config().await.unwrap(), new_config);
}

#[tokio::test]
async fn test_occupancy_counts_open_stays_by_type() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let day = date(2024, 5, 6);

    let car = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("CAR1C11").build())
        .await
        .unwrap();
    let moto = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::motorcycle("MOT2M22").build())
        .await
        .unwrap();
    let bike = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::bicycle().build())
        .await
        .unwrap();
    assert_eq!(bike.vehicle_type, VehicleType::Bicycle);

    env.parking_api.save_log(&admin, &entry_write(&car.id, day, 8, 0)).await.unwrap();
    env.parking_api.save_log(&admin, &entry_write(&moto.id, day, 8, 5)).await.unwrap();
    let mut closed = entry_write(&bike.id, day, 8, 10);
    closed.exit_time = Some(time(9, 0));
    env.parking_api.save_log(&admin, &closed).await.unwrap();
    // yesterday's open stay does not count today
    env.parking_api
        .save_log(&admin, &entry_write(&car.id, date(2024, 5, 5), 8, 0))
        .await
        .unwrap();

    let stats = env.parking_api.occupancy_for(day).await.unwrap();
    assert_eq!(stats.cars.occupied, 1);
    assert_eq!(stats.cars.available, 99);
    assert_eq!(stats.motorcycles.occupied, 1);
    assert_eq!(stats.bicycles.occupied, 0);
    assert_eq!(stats.bicycles.available, 10);
}
