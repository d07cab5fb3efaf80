//! Modelos de dados compartilhados entre aplicações
//!
//! Entidades persistidas (pacientes, médicos, endereço embutido) e os
//! payloads/projeções trocados com a API.

pub mod address;
pub mod doctor;
pub mod patient;
pub mod validation;

pub use address::{Address, AddressData, AddressUpdate};
pub use doctor::{
    Doctor, DoctorDetail, DoctorListItem, DoctorRegistration, DoctorUpdate, NewDoctor, Specialty,
};
pub use patient::{
    NewPatient, Patient, PatientDetail, PatientListItem, PatientRegistration, PatientUpdate,
};
