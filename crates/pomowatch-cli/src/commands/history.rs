use pomowatch_core::{Database, SessionStore};

pub fn run(clear: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    if clear {
        let removed = db.clear_sessions()?;
        println!("cleared {removed} sessions");
        return Ok(());
    }

    let sessions = db.load()?;
    println!("{}", serde_json::to_string_pretty(&sessions)?);
    Ok(())
}
