#![cfg(feature = "rusqlite")]
#![allow(dead_code)]

use ::rusqlite::Connection;

const LEDGER: &str = "
    CREATE TABLE entity (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE account (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        owner_id INTEGER NOT NULL
    );
    CREATE TABLE operation (
        id INTEGER PRIMARY KEY,
        from_id INTEGER NOT NULL,
        to_id INTEGER NOT NULL,
        amount INTEGER NOT NULL
    );

    INSERT INTO entity (id, name) VALUES (1, 'user1'), (2, 'user2');
    INSERT INTO account (id, name, owner_id) VALUES (1, 'acc1', 1), (2, 'acc2', 2), (3, 'acc3', 2);
    INSERT INTO operation (from_id, to_id, amount) VALUES (1, 2, 100);
    INSERT INTO operation (from_id, to_id, amount) VALUES (2, 3, 50);
";

const BLOG: &str = "
    CREATE TABLE authors (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE posts (
        id INTEGER PRIMARY KEY,
        author_id INTEGER NOT NULL REFERENCES authors(id),
        title TEXT NOT NULL,
        published_at TEXT
    );
    CREATE TABLE tags (
        id INTEGER PRIMARY KEY,
        label TEXT NOT NULL
    );
    CREATE TABLE post_tags (
        post_id INTEGER NOT NULL REFERENCES posts(id),
        tag_id INTEGER NOT NULL REFERENCES tags(id)
    );

    INSERT INTO authors (id, name) VALUES (1, 'ada'), (2, 'grace'), (3, 'edsger');
    INSERT INTO posts (id, author_id, title, published_at) VALUES
        (10, 1, 'notes', '2024-03-01 09:30:00'),
        (11, 1, 'engines', NULL),
        (20, 2, 'compilers', '2024-05-17 18:00:00');
    INSERT INTO tags (id, label) VALUES (100, 'math'), (101, 'history'), (102, 'lang');
    INSERT INTO post_tags (post_id, tag_id) VALUES
        (10, 100), (10, 101), (11, 100), (20, 102);
";

/// In-memory database holding the operation/account/entity ledger and a
/// small blog schema.
pub fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    conn.execute_batch(LEDGER)
        .expect("Failed to create ledger tables");
    conn.execute_batch(BLOG).expect("Failed to create blog tables");
    conn
}
