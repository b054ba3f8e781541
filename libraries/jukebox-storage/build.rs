// `sqlx::migrate!` embeds the SQL files at compile time, so adding or
// editing a migration has to invalidate the crate.
fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
