mod helpers;

mod login_test;
mod recovery_test;
