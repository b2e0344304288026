//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts of every role.
    users (user_id) {
        /// Primary key.
        user_id -> Int8,
        /// Display name.
        full_name -> Varchar,
        /// Lower-cased login address (unique).
        email -> Text,
        /// Contact number (unique).
        phone_number -> Varchar,
        /// `Patient`, `Doctor`, or `Admin`.
        role -> Varchar,
        /// PHC-formatted Argon2 digest.
        password_hash -> Text,
        /// Row creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Patient and doctor meetings.
    appointments (appointment_id) {
        /// Primary key.
        appointment_id -> Int8,
        /// Owning patient.
        patient_id -> Int8,
        /// Responsible doctor.
        doctor_id -> Int8,
        /// Scheduled start.
        appointment_date -> Timestamptz,
        /// `Pending`, `Confirmed`, or `Cancelled`.
        status -> Varchar,
    }
}

diesel::table! {
    /// Medication issued during an appointment.
    prescriptions (prescription_id) {
        /// Primary key.
        prescription_id -> Int8,
        /// Appointment the prescription belongs to.
        appointment_id -> Int8,
        /// Responsible doctor.
        doctor_id -> Int8,
        /// Owning patient.
        patient_id -> Int8,
        /// Date written.
        prescribed_on -> Date,
        /// Sanitised free text.
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Medicine stock.
    inventory (medicine_id) {
        /// Primary key.
        medicine_id -> Int8,
        /// Medicine name.
        name -> Varchar,
        /// Sanitised free text.
        description -> Nullable<Text>,
        /// Units in stock.
        quantity -> Int4,
        /// Unit price in minor currency units.
        unit_price_cents -> Int8,
    }
}

diesel::table! {
    /// Money received from a user.
    payments (payment_id) {
        /// Primary key.
        payment_id -> Int8,
        /// Paying user.
        user_id -> Int8,
        /// Amount in minor currency units.
        amount_cents -> Int8,
        /// Instant the payment was taken.
        payment_date -> Timestamptz,
        /// Payment method.
        method -> Varchar,
        /// `Pending`, `Completed`, or `Failed`.
        status -> Varchar,
    }
}

diesel::table! {
    /// Laboratory test orders and results.
    lab_tests (test_id) {
        /// Primary key.
        test_id -> Int8,
        /// Owning patient.
        patient_id -> Int8,
        /// Test name.
        test_name -> Varchar,
        /// Sanitised free text.
        result -> Nullable<Text>,
        /// Date taken.
        test_date -> Date,
    }
}

diesel::table! {
    /// Electronic medical records.
    emrs (emr_id) {
        /// Primary key.
        emr_id -> Int8,
        /// Owning patient.
        patient_id -> Int8,
        /// Responsible doctor.
        doctor_id -> Int8,
        /// Sanitised free text.
        summary -> Nullable<Text>,
        /// Row creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(prescriptions -> appointments (appointment_id));
diesel::joinable!(payments -> users (user_id));
diesel::joinable!(lab_tests -> users (patient_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    appointments,
    prescriptions,
    inventory,
    payments,
    lab_tests,
    emrs,
);
