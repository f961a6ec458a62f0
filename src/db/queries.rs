use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{
    Booking, BookingPatch, Customer, CustomerPatch, Service, ServicePatch, Transaction,
    TransactionStatusUpdate, DEFAULT_BOOKING_STATUS,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn now_timestamp() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap_or_else(|e| {
        tracing::warn!(value = %s, error = %e, "unparseable stored timestamp, using current time");
        now_timestamp()
    })
}

/// Builds a `LIKE` pattern matching `term` anywhere, with wildcards in the term
/// escaped. Pair with `ESCAPE '\'`. The term is lowercased so it can be matched
/// against `casefold(column)`.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn collect_rows<T>(
    stmt: &mut rusqlite::Statement<'_>,
    params: impl rusqlite::Params,
    parse: fn(&rusqlite::Row) -> rusqlite::Result<T>,
) -> anyhow::Result<Vec<T>> {
    let rows = stmt.query_map(params, parse)?;
    let mut items = vec![];
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

// ── Customers ──

const CUSTOMER_COLUMNS: &str = "id, name, contact_no, created_at, updated_at";

fn parse_customer_row(row: &rusqlite::Row) -> rusqlite::Result<Customer> {
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        contact_no: row.get(2)?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

pub fn list_customers(conn: &Connection) -> anyhow::Result<Vec<Customer>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id ASC"
    ))?;
    collect_rows(&mut stmt, [], parse_customer_row)
}

pub fn get_customer(conn: &Connection, id: i64) -> anyhow::Result<Option<Customer>> {
    let customer = conn
        .query_row(
            &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"),
            params![id],
            parse_customer_row,
        )
        .optional()?;
    Ok(customer)
}

pub fn search_customers(conn: &Connection, term: &str) -> anyhow::Result<Vec<Customer>> {
    let pattern = contains_pattern(term);
    let mut stmt = conn.prepare(&format!(
        "SELECT {CUSTOMER_COLUMNS} FROM customers
         WHERE casefold(name) LIKE ?1 ESCAPE '\\' OR casefold(contact_no) LIKE ?1 ESCAPE '\\'
         ORDER BY id ASC"
    ))?;
    collect_rows(&mut stmt, params![pattern], parse_customer_row)
}

pub fn contact_exists(conn: &Connection, contact_no: &str) -> anyhow::Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM customers WHERE contact_no = ?1",
        params![contact_no],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn insert_customer(conn: &Connection, name: &str, contact_no: &str) -> anyhow::Result<i64> {
    let now = format_timestamp(&now_timestamp());
    conn.execute(
        "INSERT INTO customers (name, contact_no, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
        params![name, contact_no, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Applies the present fields of `patch`. Returns the number of rows touched.
pub fn update_customer(conn: &Connection, id: i64, patch: &CustomerPatch) -> anyhow::Result<usize> {
    let now = format_timestamp(&now_timestamp());
    let count = conn.execute(
        "UPDATE customers SET
           name = COALESCE(?1, name),
           contact_no = COALESCE(?2, contact_no),
           updated_at = ?3
         WHERE id = ?4",
        params![patch.name, patch.contact_no, now, id],
    )?;
    Ok(count)
}

pub fn delete_customer(conn: &Connection, id: i64) -> anyhow::Result<usize> {
    let count = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
    Ok(count)
}

pub fn count_customers(conn: &Connection) -> anyhow::Result<i64> {
    count_rows(conn, "customers")
}

// ── Services ──

const SERVICE_COLUMNS: &str = "id, name, description, price, availability";

fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        availability: row.get::<_, i32>(4)? != 0,
    })
}

pub fn list_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services ORDER BY id ASC"
    ))?;
    collect_rows(&mut stmt, [], parse_service_row)
}

pub fn get_service(conn: &Connection, id: i64) -> anyhow::Result<Option<Service>> {
    let service = conn
        .query_row(
            &format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = ?1"),
            params![id],
            parse_service_row,
        )
        .optional()?;
    Ok(service)
}

pub fn search_services(conn: &Connection, term: &str) -> anyhow::Result<Vec<Service>> {
    let pattern = contains_pattern(term);
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services
         WHERE casefold(name) LIKE ?1 ESCAPE '\\' OR casefold(description) LIKE ?1 ESCAPE '\\'
         ORDER BY id ASC"
    ))?;
    collect_rows(&mut stmt, params![pattern], parse_service_row)
}

pub fn insert_service(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
    price: f64,
    availability: bool,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO services (name, description, price, availability) VALUES (?1, ?2, ?3, ?4)",
        params![name, description, price, availability as i32],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_service(conn: &Connection, id: i64, patch: &ServicePatch) -> anyhow::Result<usize> {
    let count = conn.execute(
        "UPDATE services SET
           name = COALESCE(?1, name),
           description = COALESCE(?2, description),
           price = COALESCE(?3, price),
           availability = COALESCE(?4, availability)
         WHERE id = ?5",
        params![
            patch.name,
            patch.description,
            patch.price,
            patch.availability.map(|a| a as i32),
            id,
        ],
    )?;
    Ok(count)
}

pub fn delete_service(conn: &Connection, id: i64) -> anyhow::Result<usize> {
    let count = conn.execute("DELETE FROM services WHERE id = ?1", params![id])?;
    Ok(count)
}

pub fn count_services(conn: &Connection) -> anyhow::Result<i64> {
    count_rows(conn, "services")
}

// ── Bookings ──

const BOOKING_COLUMNS: &str =
    "id, customer_id, service_date, time, service, address, status, created_at, updated_at";

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;
    Ok(Booking {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        service_date: row.get(2)?,
        time: row.get(3)?,
        service: row.get(4)?,
        address: row.get(5)?,
        status: row.get(6)?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

pub fn list_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY id ASC"
    ))?;
    collect_rows(&mut stmt, [], parse_booking_row)
}

pub fn get_booking(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let booking = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
            params![id],
            parse_booking_row,
        )
        .optional()?;
    Ok(booking)
}

pub fn booking_exists(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM bookings WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Fields of a validated booking request.
pub struct BookingInsert<'a> {
    pub customer_id: i64,
    pub service_date: &'a str,
    pub time: &'a str,
    pub service: &'a str,
    pub address: &'a str,
}

/// Inserts with the default status and identical created/updated stamps.
pub fn insert_booking(conn: &Connection, booking: &BookingInsert<'_>) -> anyhow::Result<i64> {
    let now = format_timestamp(&now_timestamp());
    conn.execute(
        "INSERT INTO bookings (customer_id, service_date, time, service, address, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            booking.customer_id,
            booking.service_date,
            booking.time,
            booking.service,
            booking.address,
            DEFAULT_BOOKING_STATUS,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_booking(conn: &Connection, id: i64, patch: &BookingPatch) -> anyhow::Result<usize> {
    let now = format_timestamp(&now_timestamp());
    let count = conn.execute(
        "UPDATE bookings SET
           service_date = COALESCE(?1, service_date),
           time = COALESCE(?2, time),
           service = COALESCE(?3, service),
           status = COALESCE(?4, status),
           updated_at = ?5
         WHERE id = ?6",
        params![
            patch.service_date,
            patch.time,
            patch.service,
            patch.status,
            now,
            id
        ],
    )?;
    Ok(count)
}

pub fn delete_booking(conn: &Connection, id: i64) -> anyhow::Result<usize> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count)
}

pub fn count_bookings(conn: &Connection) -> anyhow::Result<i64> {
    count_rows(conn, "bookings")
}

// ── Transactions ──

const TRANSACTION_COLUMNS: &str = "order_id, booking_id, transaction_id, amount, user_mobile, status, \
     payment_method, reference_id, error_message, created_at, updated_at";

fn parse_transaction_row(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;
    Ok(Transaction {
        order_id: row.get(0)?,
        booking_id: row.get(1)?,
        transaction_id: row.get(2)?,
        amount: row.get(3)?,
        user_mobile: row.get(4)?,
        status: row.get(5)?,
        payment_method: row.get(6)?,
        reference_id: row.get(7)?,
        error_message: row.get(8)?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO transactions (order_id, booking_id, transaction_id, amount, user_mobile, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            tx.order_id,
            tx.booking_id,
            tx.transaction_id,
            tx.amount,
            tx.user_mobile,
            tx.status,
            format_timestamp(&tx.created_at),
            format_timestamp(&tx.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_transaction(conn: &Connection, order_id: &str) -> anyhow::Result<Option<Transaction>> {
    let tx = conn
        .query_row(
            &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE order_id = ?1"),
            params![order_id],
            parse_transaction_row,
        )
        .optional()?;
    Ok(tx)
}

/// Writes a gateway status onto the matching row. Returns the number of rows
/// touched; zero means no transaction has that order id.
pub fn update_transaction_status(
    conn: &Connection,
    update: &TransactionStatusUpdate,
) -> anyhow::Result<usize> {
    let now = format_timestamp(&now_timestamp());
    let count = conn.execute(
        "UPDATE transactions SET
           status = ?1,
           transaction_id = COALESCE(?2, transaction_id),
           payment_method = ?3,
           reference_id = ?4,
           error_message = ?5,
           updated_at = ?6
         WHERE order_id = ?7",
        params![
            update.status,
            update.transaction_id,
            update.payment_method,
            update.reference_id,
            update.message,
            now,
            update.order_id,
        ],
    )?;
    Ok(count)
}

// ── Counts ──

fn count_rows(conn: &Connection, table: &'static str) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
