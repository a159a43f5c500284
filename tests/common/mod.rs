//! Shared fixtures for the SQLite-backed integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use deckhand::{Entity, Session, SqliteConnection};

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[table_name = "users"]
pub struct User {
    #[primary_key]
    pub id: i64,
    pub username: String,
    pub age: i32,
    #[column_name = "registration_date"]
    pub registration: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[table_name = "notes"]
pub struct Note {
    #[primary_key]
    pub id: i32,
    pub body: String,
    pub due: Option<NaiveDate>,
    pub priority: Option<i32>,
    #[skip]
    pub rendered: String,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user(username: &str, age: i32, registration: NaiveDate) -> User {
    User {
        username: username.to_string(),
        age,
        registration,
        ..Default::default()
    }
}

/// In-memory database with the `users` and `notes` tables created.
pub fn connection() -> SqliteConnection {
    let conn = SqliteConnection::open_in_memory().unwrap();
    let session = Session::new(&conn);
    session.create_table::<User>().unwrap();
    session.create_table::<Note>().unwrap();
    conn
}
