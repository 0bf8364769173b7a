//! Startup provisioning: default operator account and demo records.

use tracing::info;

use crate::auth::AccessGate;
use crate::db::{Database, DbResult};
use crate::models::{AppointmentInput, PatientInput, DEFAULT_ROLE};
use crate::{storage_error, ClinicResult};

pub const DEFAULT_ADMIN_USERNAME: &str = "atinukeade";
pub const DEFAULT_ADMIN_PASSWORD: &str = "dada";

const SAMPLE_NAMES: [&str; 10] = [
    "Chinwe Okoro",
    "Adebola Johnson",
    "Ngozi Eze",
    "Chinedu Okafor",
    "Amina Mohammed",
    "Tunde Williams",
    "Funke Adebayo",
    "Emeka Nwankwo",
    "Zainab Abdullahi",
    "Oluwatobi Brown",
];
const SAMPLE_STATES: [&str; 10] = [
    "Lagos", "Abuja", "Kano", "Rivers", "Oyo", "Edo", "Delta", "Enugu", "Kaduna", "Ogun",
];
const SAMPLE_OCCUPATIONS: [&str; 10] = [
    "Teacher",
    "Engineer",
    "Doctor",
    "Business Owner",
    "Farmer",
    "Student",
    "Civil Servant",
    "Nurse",
    "Accountant",
    "Lawyer",
];
const SAMPLE_RELIGIONS: [&str; 4] = ["Christianity", "Islam", "Traditional", "Other"];
const SAMPLE_BLOOD_GROUPS: [&str; 8] = ["O+", "O-", "A+", "A-", "B+", "B-", "AB+", "AB-"];
const SAMPLE_GENOTYPES: [&str; 3] = ["AA", "AS", "SS"];
const SAMPLE_MARITAL: [&str; 4] = ["Single", "Married", "Divorced", "Widowed"];
const SAMPLE_TREATMENTS: [&str; 5] = [
    "Routine Checkup",
    "Teeth Cleaning",
    "Filling",
    "Extraction",
    "Root Canal",
];
const SAMPLE_TIMES: [&str; 4] = ["09:00 AM", "10:30 AM", "02:00 PM", "04:00 PM"];
const SAMPLE_DATES: [&str; 5] = [
    "2025-09-20",
    "2025-09-22",
    "2025-09-25",
    "2025-09-27",
    "2025-09-30",
];
const SAMPLE_STATUSES: [&str; 3] = ["scheduled", "confirmed", "completed"];

/// Create the operator account unless one with that username exists.
///
/// Returns whether an account was created. An existing account keeps its
/// password.
pub fn seed_default_admin(
    db: &Database,
    gate: &AccessGate,
    username: &str,
    password: &str,
) -> ClinicResult<bool> {
    if db
        .user_exists(username)
        .map_err(|e| storage_error("Failed to seed admin account", e))?
    {
        return Ok(false);
    }

    let hash = gate.hash_password(password)?;
    let created = db
        .ensure_user(username, &hash, DEFAULT_ROLE)
        .map_err(|e| storage_error("Failed to seed admin account", e))?;
    if created {
        info!(username = %username, "default admin account created");
    }
    Ok(created)
}

/// Insert demo patients and appointments into an empty database.
///
/// Returns the number of patients inserted (0 when patients already exist).
pub fn seed_sample_data(db: &Database) -> DbResult<usize> {
    if db.count_patients()? > 0 {
        return Ok(0);
    }

    let mut ids = Vec::with_capacity(SAMPLE_NAMES.len());
    for (i, name) in SAMPLE_NAMES.iter().enumerate() {
        let state = SAMPLE_STATES[i % SAMPLE_STATES.len()];
        let mut patient = PatientInput::new(
            *name,
            18 + (i as i64 * 7) % 50,
            if i % 2 == 0 { "Male" } else { "Female" },
        );
        patient.phone = Some(format!("+23480{}", 1_000_000 + i * 731_129));
        patient.address = Some(format!("{} Street, {}", i * 9 + 1, state));
        patient.blood_group = Some(SAMPLE_BLOOD_GROUPS[i % SAMPLE_BLOOD_GROUPS.len()].into());
        patient.genotype = Some(SAMPLE_GENOTYPES[i % SAMPLE_GENOTYPES.len()].into());
        patient.occupation = Some(SAMPLE_OCCUPATIONS[i % SAMPLE_OCCUPATIONS.len()].into());
        patient.religion = Some(SAMPLE_RELIGIONS[i % SAMPLE_RELIGIONS.len()].into());
        patient.state = Some(state.into());
        patient.marital_status = Some(SAMPLE_MARITAL[i % SAMPLE_MARITAL.len()].into());
        patient.next_of_kin = Some(format!("Next of Kin {}", i + 1));
        patient.past_dental_history = Some("Regular dental checkups".into());
        patient.family_history = Some("No significant family history".into());
        patient.past_medical_history = Some("No known medical conditions".into());
        patient.rhesus = Some("Positive".into());

        ids.push(db.insert_patient(&patient)?);
    }

    for (i, date) in SAMPLE_DATES.iter().enumerate() {
        let status = SAMPLE_STATUSES[i % SAMPLE_STATUSES.len()];
        let mut appointment =
            AppointmentInput::new(ids[i].as_str(), *date, SAMPLE_TIMES[i % SAMPLE_TIMES.len()]);
        appointment.patient_name = Some(SAMPLE_NAMES[i].into());
        appointment.treatment = Some(SAMPLE_TREATMENTS[i % SAMPLE_TREATMENTS.len()].into());
        appointment.status = Some(status.into());
        if status == "completed" {
            appointment.notes = Some("Appointment completed successfully".into());
        }
        db.insert_appointment(&appointment)?;
    }

    info!(
        patients = ids.len(),
        appointments = SAMPLE_DATES.len(),
        "sample data seeded"
    );
    Ok(ids.len())
}
