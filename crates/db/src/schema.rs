use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create workshops table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workshops (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            location VARCHAR(255) NOT NULL,
            contact VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create shifts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shifts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            workshop_id UUID NOT NULL REFERENCES workshops(id),
            name VARCHAR(255) NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            slots_per_shift INTEGER NOT NULL DEFAULT 2,
            position INTEGER NOT NULL DEFAULT 0,
            CONSTRAINT valid_shift_window CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            role VARCHAR(32) NOT NULL DEFAULT 'client',
            workshop_id UUID NULL REFERENCES workshops(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            workshop_id UUID NOT NULL REFERENCES workshops(id),
            name VARCHAR(255) NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 60,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create vehicles table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vehicles (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL REFERENCES users(id),
            brand VARCHAR(255) NOT NULL,
            model VARCHAR(255) NOT NULL,
            plate VARCHAR(32) NOT NULL UNIQUE,
            year INTEGER NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table. end_time is stored, never recomputed from the
    // service's current duration, so overlap checks against history stay
    // correct after a service is edited.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            client_id UUID NOT NULL REFERENCES users(id),
            vehicle_id UUID NOT NULL REFERENCES vehicles(id),
            workshop_id UUID NOT NULL REFERENCES workshops(id),
            service_id UUID NOT NULL REFERENCES services(id),
            mechanic_id UUID NOT NULL REFERENCES users(id),
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'Pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_interval CHECK (end_time <> start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_shifts_workshop_id ON shifts(workshop_id);
        CREATE INDEX IF NOT EXISTS idx_users_role_workshop ON users(role, workshop_id);
        CREATE INDEX IF NOT EXISTS idx_services_workshop_id ON services(workshop_id);
        CREATE INDEX IF NOT EXISTS idx_vehicles_owner_id ON vehicles(owner_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_workshop_date ON bookings(workshop_id, date);
        CREATE INDEX IF NOT EXISTS idx_bookings_client_id ON bookings(client_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_mechanic_id ON bookings(mechanic_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
