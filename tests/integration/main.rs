//! HTTP-level integration tests. They need a disposable Postgres database
//! named by `TABAUDIT_TEST_DATABASE_URL` and are skipped when it is unset.

mod helpers;

mod admin_test;
mod check_in_test;
mod device_lifecycle_test;
mod otp_test;
