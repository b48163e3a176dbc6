//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Enumerations
//! are stored as constrained `TEXT` and money as `BIGINT` cents.

diesel::table! {
    /// Staff accounts.
    profiles (id) {
        id -> Uuid,
        email -> Varchar,
        full_name -> Varchar,
        phone -> Nullable<Varchar>,
        role -> Text,
        /// Argon2 PHC string; never leaves the adapter layer.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Financing prospects.
    potential_riders (id) {
        id -> Uuid,
        full_name -> Varchar,
        id_number -> Varchar,
        age -> Int4,
        postal_address -> Varchar,
        primary_phone -> Varchar,
        secondary_phone -> Nullable<Varchar>,
        tertiary_phone -> Nullable<Varchar>,
        introducer_name -> Nullable<Varchar>,
        introducer_id -> Nullable<Varchar>,
        introducer_phone -> Nullable<Varchar>,
        introducer_residential_area -> Nullable<Varchar>,
        introducer_previous_bike -> Nullable<Varchar>,
        preferred_bike_make -> Nullable<Varchar>,
        probable_financing_date -> Nullable<Date>,
        status -> Text,
        created_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Motorcycle inventory.
    bikes (id) {
        id -> Uuid,
        make -> Varchar,
        chassis_no -> Varchar,
        engine_no -> Varchar,
        registration_no -> Nullable<Varchar>,
        colour -> Varchar,
        purchase_date -> Date,
        purchase_price_cents -> Int8,
        status -> Text,
        current_rider_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Riders under a repayment plan.
    financed_riders (id) {
        id -> Uuid,
        potential_rider_id -> Nullable<Uuid>,
        bike_id -> Nullable<Uuid>,
        full_name -> Varchar,
        id_number -> Varchar,
        age -> Int4,
        postal_address -> Varchar,
        residential_area -> Varchar,
        primary_phone -> Varchar,
        secondary_phone -> Nullable<Varchar>,
        tertiary_phone -> Nullable<Varchar>,
        next_of_kin_name -> Varchar,
        next_of_kin_phone -> Varchar,
        next_of_kin_id -> Varchar,
        next_of_kin_relationship -> Varchar,
        referee_name -> Nullable<Varchar>,
        referee_id -> Nullable<Varchar>,
        referee_phone -> Nullable<Varchar>,
        operation_slot -> Text,
        operation_slot_cost_cents -> Int8,
        daily_remittance_cents -> Int8,
        total_investment_cents -> Int8,
        expected_operation_days -> Int4,
        start_date -> Date,
        status -> Text,
        created_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Repayments.
    payments (id) {
        id -> Uuid,
        rider_id -> Uuid,
        amount_cents -> Int8,
        payment_date -> Date,
        payment_method -> Text,
        status -> Text,
        transaction_reference -> Nullable<Varchar>,
        notes -> Nullable<Varchar>,
        created_by -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Business expenses.
    expenses (id) {
        id -> Uuid,
        category -> Text,
        description -> Varchar,
        amount_cents -> Int8,
        expense_date -> Date,
        reference_no -> Nullable<Varchar>,
        notes -> Nullable<Varchar>,
        created_by -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// SMS dispatch log.
    sms_notifications (id) {
        id -> Uuid,
        rider_id -> Nullable<Uuid>,
        recipient_phone -> Varchar,
        message -> Text,
        message_type -> Text,
        status -> Text,
        sent_at -> Nullable<Timestamptz>,
        error_message -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(financed_riders -> bikes (bike_id));
diesel::joinable!(payments -> financed_riders (rider_id));

diesel::allow_tables_to_appear_in_same_query!(
    profiles,
    potential_riders,
    bikes,
    financed_riders,
    payments,
    expenses,
    sms_notifications,
);
