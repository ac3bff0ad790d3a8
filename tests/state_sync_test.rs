// ==========================================
// State sync integration tests
// ==========================================
// Writes through the API must reach the occupancy view through
// the snapshot channel.
// ==========================================

mod helpers;

use helpers::api_test_helper::ApiTestEnv;
use helpers::test_data_builder::*;
use chrono::Local;
use parking_occupancy::domain::ParkingConfig;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn test_occupancy_view_follows_writes() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let mut handle = env.state.start_sync().await.unwrap();
    let today = Local::now().date_naive();

    assert_eq!(handle.occupancy.borrow().stats.cars.occupied, 0);

    let car = env
        .parking_api
        .register_vehicle(&admin, &NewVehicleBuilder::car("SYN1C00").build())
        .await
        .unwrap();
    env.parking_api
        .save_log(&admin, &entry_write(&car.id, today, 8, 0))
        .await
        .unwrap();

    let occupied = timeout(Duration::from_secs(5), async {
        loop {
            let occupied = handle.occupancy.borrow_and_update().stats.cars.occupied;
            if occupied == 1 {
                return occupied;
            }
            if handle.occupancy.changed().await.is_err() {
                return occupied;
            }
        }
    })
    .await
    .expect("occupancy view did not update");
    assert_eq!(occupied, 1);
}

#[tokio::test]
async fn test_config_change_reaches_view() {
    let env = ApiTestEnv::new().expect("test env");
    let admin = env.admin().await;
    let mut handle = env.state.start_sync().await.unwrap();

    let config = ParkingConfig {
        total_car_spots: 12,
        total_motorcycle_spots: 4,
        total_bicycle_spots: 2,
    };
    env.parking_api.save_config(&admin, &config).await.unwrap();

    let total = timeout(Duration::from_secs(5), async {
        loop {
            let total = handle.occupancy.borrow_and_update().stats.cars.total;
            if total == 12 || handle.occupancy.changed().await.is_err() {
                return total;
            }
        }
    })
    .await
    .expect("config did not reach the view");
    assert_eq!(total, 12);
    assert_eq!(handle.occupancy.borrow().config, config);
}
