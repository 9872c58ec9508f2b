//! labgrade main entrypoint.

use labgrade::run;

fn main() {
    if let Err(e) = run() {
        labgrade::ui::messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
