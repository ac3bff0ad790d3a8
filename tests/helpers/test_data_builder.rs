// ==========================================
// Test data builders
// ==========================================

use chrono::{NaiveDate, NaiveTime};
use parking_occupancy::domain::{
    LogWrite, NewVehicle, ParkingLog, UniversityLink, Vehicle, VehicleType,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

// ==========================================
// NewVehicle builder (registration input)
// ==========================================

pub struct NewVehicleBuilder {
    input: NewVehicle,
}

impl NewVehicleBuilder {
    pub fn car(plate: &str) -> Self {
        Self::of_type(VehicleType::Car).plate(plate)
    }

    pub fn motorcycle(plate: &str) -> Self {
        Self::of_type(VehicleType::Motorcycle).plate(plate)
    }

    pub fn bicycle() -> Self {
        Self::of_type(VehicleType::Bicycle)
    }

    fn of_type(vehicle_type: VehicleType) -> Self {
        Self {
            input: NewVehicle {
                plate: String::new(),
                owner_name: "Maria Oliveira".to_string(),
                university_link: UniversityLink::Student,
                model: "Modelo Padrão".to_string(),
                color: "Preto".to_string(),
                vehicle_type,
            },
        }
    }

    pub fn plate(mut self, plate: &str) -> Self {
        self.input.plate = plate.to_string();
        self
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.input.owner_name = owner.to_string();
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.input.model = model.to_string();
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.input.color = color.to_string();
        self
    }

    pub fn link(mut self, link: UniversityLink) -> Self {
        self.input.university_link = link;
        self
    }

    pub fn build(self) -> NewVehicle {
        self.input
    }
}

// ==========================================
// Vehicle builder (snapshot data for engine tests)
// ==========================================

pub struct VehicleBuilder {
    vehicle: Vehicle,
}

impl VehicleBuilder {
    pub fn new(id: &str, vehicle_type: VehicleType) -> Self {
        Self {
            vehicle: Vehicle {
                id: id.to_string(),
                plate: id.to_uppercase(),
                owner_name: format!("Dono {}", id),
                university_link: UniversityLink::AdministrativeStaff,
                model: "Modelo".to_string(),
                color: "Azul".to_string(),
                vehicle_type,
                registered_by: "portaria@campus.br".to_string(),
                edit_history: vec![],
            },
        }
    }

    pub fn plate(mut self, plate: &str) -> Self {
        self.vehicle.plate = plate.to_string();
        self
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.vehicle.owner_name = owner.to_string();
        self
    }

    pub fn build(self) -> Vehicle {
        self.vehicle
    }
}

// ==========================================
// ParkingLog builder
// ==========================================

pub struct LogBuilder {
    log: ParkingLog,
}

impl LogBuilder {
    pub fn new(id: &str, vehicle: &Vehicle, on: NaiveDate) -> Self {
        Self {
            log: ParkingLog {
                id: id.to_string(),
                vehicle_id: vehicle.id.clone(),
                plate: vehicle.plate.clone(),
                date: on,
                entry_time: time(8, 0),
                exit_time: None,
                operator_name: "op@campus.br".to_string(),
                edit_history: vec![],
            },
        }
    }

    pub fn entry(mut self, h: u32, m: u32) -> Self {
        self.log.entry_time = time(h, m);
        self
    }

    pub fn exit(mut self, h: u32, m: u32) -> Self {
        self.log.exit_time = Some(time(h, m));
        self
    }

    pub fn build(self) -> ParkingLog {
        self.log
    }
}

/// Entry event input
pub fn entry_write(vehicle_id: &str, on: NaiveDate, h: u32, m: u32) -> LogWrite {
    LogWrite {
        vehicle_id: vehicle_id.to_string(),
        date: on,
        entry_time: time(h, m),
        exit_time: None,
    }
}
