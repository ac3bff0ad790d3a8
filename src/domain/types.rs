// ==========================================
// Parking occupancy - domain enumerations
// ==========================================
// Wire names are the Portuguese labels stored in the database
// and exported in reports; Rust names stay in English.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// VehicleType - spot pool category
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "Carro")]
    Car,
    #[serde(rename = "Moto")]
    Motorcycle,
    #[serde(rename = "Bicicleta")]
    Bicycle,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] =
        [VehicleType::Car, VehicleType::Motorcycle, VehicleType::Bicycle];

    /// Stored/exported label
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "Carro",
            VehicleType::Motorcycle => "Moto",
            VehicleType::Bicycle => "Bicicleta",
        }
    }

    /// Parse the stored label
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Carro" => Some(VehicleType::Car),
            "Moto" => Some(VehicleType::Motorcycle),
            "Bicicleta" => Some(VehicleType::Bicycle),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// UniversityLink - owner's tie to the university
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniversityLink {
    #[serde(rename = "Discente")]
    Student,
    #[serde(rename = "Servidor Docente")]
    Faculty,
    #[serde(rename = "Servidor Técnico Administrativo")]
    AdministrativeStaff,
    #[serde(rename = "Visitante")]
    Visitor,
}

impl UniversityLink {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniversityLink::Student => "Discente",
            UniversityLink::Faculty => "Servidor Docente",
            UniversityLink::AdministrativeStaff => "Servidor Técnico Administrativo",
            UniversityLink::Visitor => "Visitante",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Discente" => Some(UniversityLink::Student),
            "Servidor Docente" => Some(UniversityLink::Faculty),
            "Servidor Técnico Administrativo" => Some(UniversityLink::AdministrativeStaff),
            "Visitante" => Some(UniversityLink::Visitor),
            _ => None,
        }
    }
}

impl fmt::Display for UniversityLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// UserRole
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "Administrador")]
    Administrator,
    #[serde(rename = "Operador")]
    Operator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrator => "Administrador",
            UserRole::Operator => "Operador",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Administrador" => Some(UserRole::Administrator),
            "Operador" => Some(UserRole::Operator),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
