//! Main robot executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Initialise the equipment backend
//!     - Run the course dispatcher, which executes the segments in sequence:
//!         - Each segment loop runs once per tick:
//!             - Background sampling (odometry, heading, sensor snapshot)
//!             - Segment state machine step (guards, maneuvers, drive commands)
//!             - Telemetry archiving
//!     - Stop the motors and close the session
//!
//! The only equipment backend built into this crate is the simulated one (`sim` feature, on by
//! default). Hardware backends implement the `eqpt::Eqpt` trait in their own crate and drive
//! the same course code.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

#[cfg(feature = "sim")]
use bot_lib::{
    course::{CourseMgr, CourseParams},
    drive_ctrl::{self, DriveCtrl},
    eqpt::sim::{SimConfig, SimEqpt},
    loc::LocParams,
    monitor::Monitor,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::info;

// Internal
#[cfg(feature = "sim")]
use util::archive::Archiver;
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("bot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Corsa Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    #[cfg(feature = "sim")]
    return run_sim_course(session);

    #[cfg(not(feature = "sim"))]
    return Err(eyre!(
        "No equipment backend enabled - rebuild with the `sim` feature or link a hardware \
         backend"
    ));
}

/// Run the course against the simulated equipment backend.
#[cfg(feature = "sim")]
fn run_sim_course(session: Session) -> Result<(), Report> {
    // ---- LOAD PARAMETERS ----

    let loc_params: LocParams =
        util::params::load("loc.toml").wrap_err("Could not load loc params")?;
    let drive_params: drive_ctrl::Params =
        util::params::load("drive_ctrl.toml").wrap_err("Could not load drive_ctrl params")?;
    let course_params: CourseParams =
        util::params::load("course.toml").wrap_err("Could not load course params")?;
    let sim_config: SimConfig =
        util::params::load("sim.toml").wrap_err("Could not load sim config")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut monitor = Monitor::new(&loc_params);
    let mut drive = DriveCtrl::new(drive_params);
    let course = CourseMgr::new(course_params);

    let mut eqpt = SimEqpt::new(sim_config);

    let mut tm_arch = Archiver::from_path(&session, "course_tm.csv")
        .map_err(|e| eyre!("Failed to initialise the telemetry archive: {}", e))?;

    info!("Module initialisation complete\n");

    // ---- RUN THE COURSE ----

    info!("Beginning course\n");

    // Errors are already logged and the motors stopped by the course manager; the exec carries
    // on to shut the session down cleanly either way.
    let result = course.run(&mut eqpt, &mut monitor, &mut drive, &mut tm_arch);

    info!(
        "Final state: {:.0} mm travelled, heading {:.1} deg, {} ticks ({:.1} s simulated)",
        monitor.distance_mm(),
        monitor.heading_deg(),
        eqpt.ticks(),
        eqpt.ticks() as f64 * drive.params().tick_period_s,
    );

    // ---- SHUTDOWN ----

    info!("End of execution");

    session.exit();

    result.map_err(|e| eyre!("Course did not complete: {}", e))
}
