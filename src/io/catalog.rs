//! Appliance catalog load/save.
//!
//! The catalog is a CSV table with one row per appliance. Rows are grouped
//! into user categories by `user_name` in first-appearance order; all rows of
//! one user must agree on `num_users` and `user_preference`. Empty numeric
//! cells mean "unset" and fall back to the model defaults, so a saved catalog
//! loads back into the identical model and saves again byte for byte.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    Appliance, ApplianceConfig, DayScope, DutyCycleConfig, PowerSeries, UseCase, User, Window,
};

/// One catalog row. Field order is the column order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogRow {
    user_name: String,
    num_users: u32,
    user_preference: u32,
    name: String,
    number: u32,
    power: String,
    num_windows: u8,
    func_time: u32,
    time_fraction_random_variability: f64,
    func_cycle: u32,
    fixed: String,
    fixed_cycle: u8,
    occasional_use: f64,
    flat: String,
    thermal_p_var: f64,
    pref_index: u32,
    wd_we_type: u8,
    random_var_w: f64,
    window_1_start: Option<u32>,
    window_1_end: Option<u32>,
    window_2_start: Option<u32>,
    window_2_end: Option<u32>,
    window_3_start: Option<u32>,
    window_3_end: Option<u32>,
    p_11: Option<f64>,
    t_11: Option<u32>,
    p_12: Option<f64>,
    t_12: Option<u32>,
    r_c1: Option<f64>,
    cw11_start: Option<u32>,
    cw11_end: Option<u32>,
    cw12_start: Option<u32>,
    cw12_end: Option<u32>,
    p_21: Option<f64>,
    t_21: Option<u32>,
    p_22: Option<f64>,
    t_22: Option<u32>,
    r_c2: Option<f64>,
    cw21_start: Option<u32>,
    cw21_end: Option<u32>,
    cw22_start: Option<u32>,
    cw22_end: Option<u32>,
    p_31: Option<f64>,
    t_31: Option<u32>,
    p_32: Option<f64>,
    t_32: Option<u32>,
    r_c3: Option<f64>,
    cw31_start: Option<u32>,
    cw31_end: Option<u32>,
    cw32_start: Option<u32>,
    cw32_end: Option<u32>,
}

/// Loads a catalog file into a use case.
///
/// # Errors
///
/// I/O and CSV errors, plus `Configuration` errors for structurally invalid
/// rows (see the module docs).
pub fn load_catalog(path: &Path) -> Result<UseCase> {
    let file = File::open(path)?;
    let mut use_case = read_catalog(file)?;
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        use_case.name = stem.to_string();
    }
    Ok(use_case)
}

/// Reads a catalog from any reader.
pub fn read_catalog(reader: impl Read) -> Result<UseCase> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    let mut use_case = UseCase::new("catalog", Vec::new());
    for row in rdr.deserialize::<CatalogRow>() {
        let row = row?;
        let user_idx = match use_case.users.iter().position(|u| u.name == row.user_name) {
            Some(idx) => {
                let user = &use_case.users[idx];
                if user.num_users != row.num_users {
                    return Err(Error::config(
                        "catalog.num_users",
                        format!("must be the same for every row of user '{}'", row.user_name),
                    ));
                }
                if user.user_preference != row.user_preference {
                    return Err(Error::config(
                        "catalog.user_preference",
                        format!("must be the same for every row of user '{}'", row.user_name),
                    ));
                }
                idx
            }
            None => {
                use_case.add_user(User::new(
                    row.user_name.as_str(),
                    row.num_users,
                    row.user_preference,
                )?);
                use_case.users.len() - 1
            }
        };
        let config = row_to_config(&row)?;
        use_case.users[user_idx].add_appliance(config)?;
    }
    Ok(use_case)
}

/// Saves a use case as a catalog file.
///
/// # Errors
///
/// I/O and CSV errors only; the model is valid by construction.
pub fn save_catalog(use_case: &UseCase, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_catalog(use_case, file)
}

/// Writes a catalog to any writer, one row per appliance.
pub fn write_catalog(use_case: &UseCase, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for user in &use_case.users {
        for appliance in &user.appliances {
            wtr.serialize(appliance_to_row(user, appliance))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn row_to_config(row: &CatalogRow) -> Result<ApplianceConfig> {
    let mut cfg = ApplianceConfig {
        name: row.name.clone(),
        number: row.number,
        power: PowerSeries::parse("power", &row.power)?,
        num_windows: row.num_windows,
        func_time: row.func_time,
        time_fraction_random_variability: row.time_fraction_random_variability,
        func_cycle: row.func_cycle,
        fixed: parse_flag("fixed", &row.fixed)?,
        flat: parse_flag("flat", &row.flat)?,
        fixed_cycle: row.fixed_cycle,
        thermal_p_var: row.thermal_p_var,
        occasional_use: row.occasional_use,
        pref_index: row.pref_index,
        day_scope: DayScope::from_code(row.wd_we_type)?,
        random_var_w: row.random_var_w,
        ..ApplianceConfig::default()
    };

    cfg.windows = [
        window_from_cells("window_1", row.window_1_start, row.window_1_end)?
            .unwrap_or(Window::EMPTY),
        window_from_cells("window_2", row.window_2_start, row.window_2_end)?
            .unwrap_or(Window::EMPTY),
        window_from_cells("window_3", row.window_3_start, row.window_3_end)?
            .unwrap_or(Window::EMPTY),
    ];

    let cycle_cells = [
        (
            row.p_11, row.t_11, row.p_12, row.t_12, row.r_c1,
            ("cw11", row.cw11_start, row.cw11_end),
            ("cw12", row.cw12_start, row.cw12_end),
        ),
        (
            row.p_21, row.t_21, row.p_22, row.t_22, row.r_c2,
            ("cw21", row.cw21_start, row.cw21_end),
            ("cw22", row.cw22_start, row.cw22_end),
        ),
        (
            row.p_31, row.t_31, row.p_32, row.t_32, row.r_c3,
            ("cw31", row.cw31_start, row.cw31_end),
            ("cw32", row.cw32_start, row.cw32_end),
        ),
    ];
    for (k, (p_a, t_a, p_b, t_b, jitter, cw_a, cw_b)) in cycle_cells.into_iter().enumerate() {
        let window_a = window_from_cells(cw_a.0, cw_a.1, cw_a.2)?;
        let window_b = window_from_cells(cw_b.0, cw_b.1, cw_b.2)?;
        let any_set = p_a.is_some()
            || t_a.is_some()
            || p_b.is_some()
            || t_b.is_some()
            || jitter.is_some()
            || window_a.is_some()
            || window_b.is_some();
        if !any_set {
            continue;
        }
        cfg.cycles[k] = Some(DutyCycleConfig {
            power_a: p_a.unwrap_or(0.0),
            time_a: t_a.unwrap_or(0),
            power_b: p_b.unwrap_or(0.0),
            time_b: t_b.unwrap_or(0),
            jitter: jitter.unwrap_or(0.0),
            window_a,
            window_b,
        });
    }

    Ok(cfg)
}

fn appliance_to_row(user: &User, app: &Appliance) -> CatalogRow {
    let mut row = CatalogRow {
        user_name: user.name.clone(),
        num_users: user.num_users,
        user_preference: user.user_preference,
        name: app.name.clone(),
        number: app.number,
        power: app.power.to_cell(),
        num_windows: app.num_windows,
        func_time: app.func_time,
        time_fraction_random_variability: app.time_fraction_random_variability,
        func_cycle: app.func_cycle,
        fixed: flag_cell(app.fixed),
        fixed_cycle: app.fixed_cycle,
        occasional_use: app.occasional_use,
        flat: flag_cell(app.flat),
        thermal_p_var: app.thermal_p_var,
        pref_index: app.pref_index,
        wd_we_type: app.day_scope.code(),
        random_var_w: app.random_var_w,
        window_1_start: Some(app.windows[0].start),
        window_1_end: Some(app.windows[0].end),
        window_2_start: Some(app.windows[1].start),
        window_2_end: Some(app.windows[1].end),
        window_3_start: Some(app.windows[2].start),
        window_3_end: Some(app.windows[2].end),
        ..CatalogRow::default()
    };
    if let Some(c) = &app.cycles[0] {
        row.p_11 = Some(c.power_a);
        row.t_11 = Some(c.time_a);
        row.p_12 = Some(c.power_b);
        row.t_12 = Some(c.time_b);
        row.r_c1 = Some(c.jitter);
        row.cw11_start = Some(c.window_a.start);
        row.cw11_end = Some(c.window_a.end);
        row.cw12_start = Some(c.window_b.start);
        row.cw12_end = Some(c.window_b.end);
    }
    if let Some(c) = &app.cycles[1] {
        row.p_21 = Some(c.power_a);
        row.t_21 = Some(c.time_a);
        row.p_22 = Some(c.power_b);
        row.t_22 = Some(c.time_b);
        row.r_c2 = Some(c.jitter);
        row.cw21_start = Some(c.window_a.start);
        row.cw21_end = Some(c.window_a.end);
        row.cw22_start = Some(c.window_b.start);
        row.cw22_end = Some(c.window_b.end);
    }
    if let Some(c) = &app.cycles[2] {
        row.p_31 = Some(c.power_a);
        row.t_31 = Some(c.time_a);
        row.p_32 = Some(c.power_b);
        row.t_32 = Some(c.time_b);
        row.r_c3 = Some(c.jitter);
        row.cw31_start = Some(c.window_a.start);
        row.cw31_end = Some(c.window_a.end);
        row.cw32_start = Some(c.window_b.start);
        row.cw32_end = Some(c.window_b.end);
    }
    row
}

fn parse_flag(field: &str, cell: &str) -> Result<bool> {
    match cell.trim() {
        "yes" => Ok(true),
        "no" => Ok(false),
        other => Err(Error::config(
            field,
            format!("must be 'yes' or 'no', got '{other}'"),
        )),
    }
}

fn flag_cell(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn window_from_cells(field: &str, start: Option<u32>, end: Option<u32>) -> Result<Option<Window>> {
    match (start, end) {
        (Some(s), Some(e)) => Window::new(s, e).map(Some).map_err(|_| {
            Error::config(
                field,
                format!("[{s}, {e}) is not a valid minute interval"),
            )
        }),
        (None, None) => Ok(None),
        _ => Err(Error::config(
            field,
            "start and end cells must be set together",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{read_catalog, write_catalog};
    use crate::model::{ApplianceConfig, DutyCycleConfig, PowerSeries, UseCase, User, Window};

    fn sample_use_case() -> UseCase {
        let mut homes = User::new("household", 12, 2).expect("valid");
        homes
            .add_appliance(ApplianceConfig {
                name: "indoor bulb".to_string(),
                number: 4,
                power: PowerSeries::scalar(7.0),
                num_windows: 2,
                windows: [
                    Window {
                        start: 1170,
                        end: 1440,
                    },
                    Window { start: 0, end: 30 },
                    Window::EMPTY,
                ],
                random_var_w: 0.2,
                func_time: 120,
                time_fraction_random_variability: 0.2,
                func_cycle: 10,
                ..ApplianceConfig::default()
            })
            .expect("valid appliance");
        let mut cooker = ApplianceConfig {
            name: "cooker".to_string(),
            power: PowerSeries::scalar(1000.0),
            windows: [
                Window { start: 660, end: 750 },
                Window::EMPTY,
                Window::EMPTY,
            ],
            func_time: 40,
            func_cycle: 5,
            fixed_cycle: 1,
            pref_index: 1,
            ..ApplianceConfig::default()
        };
        cooker
            .set_cycle(
                1,
                DutyCycleConfig {
                    power_a: 1200.0,
                    time_a: 10,
                    power_b: 700.0,
                    time_b: 20,
                    jitter: 0.1,
                    ..DutyCycleConfig::default()
                },
            )
            .expect("cycle 1 is valid");
        homes.add_appliance(cooker).expect("valid appliance");

        let mut school = User::new("school", 1, 0).expect("valid");
        school
            .add_appliance(ApplianceConfig {
                name: "classroom light".to_string(),
                number: 10,
                power: PowerSeries::scalar(18.0),
                windows: [
                    Window { start: 480, end: 960 },
                    Window::EMPTY,
                    Window::EMPTY,
                ],
                func_time: 400,
                flat: true,
                fixed: true,
                ..ApplianceConfig::default()
            })
            .expect("valid appliance");

        UseCase::new("sample", vec![homes, school])
    }

    fn to_csv(uc: &UseCase) -> String {
        let mut buf = Vec::new();
        write_catalog(uc, &mut buf).expect("write succeeds");
        String::from_utf8(buf).expect("valid utf8")
    }

    #[test]
    fn round_trip_preserves_the_model() {
        let original = sample_use_case();
        let csv = to_csv(&original);
        let loaded = read_catalog(csv.as_bytes()).expect("load succeeds");
        assert_eq!(loaded.users.len(), 2);
        assert_eq!(loaded.appliance_count(), 3);
        assert_eq!(loaded.users, original.users);
    }

    #[test]
    fn save_load_save_is_byte_stable() {
        let original = sample_use_case();
        let first = to_csv(&original);
        let loaded = read_catalog(first.as_bytes()).expect("load succeeds");
        let second = to_csv(&loaded);
        assert_eq!(first, second);
    }

    #[test]
    fn inconsistent_num_users_is_rejected() {
        let csv = to_csv(&sample_use_case());
        // duplicate the second household row with a different member count
        let mut lines: Vec<&str> = csv.lines().collect();
        let forged = lines[2].replacen("household,12", "household,13", 1);
        lines.push(&forged);
        let joined = lines.join("\n");
        assert!(read_catalog(joined.as_bytes()).is_err());
    }

    #[test]
    fn bad_flag_value_is_rejected() {
        let csv = to_csv(&sample_use_case()).replace(",yes,", ",maybe,");
        assert!(read_catalog(csv.as_bytes()).is_err());
    }

    #[test]
    fn half_set_window_cells_are_rejected() {
        let original = sample_use_case();
        let csv = to_csv(&original);
        // blank out one window_1_end cell (column 19, right after start)
        let mut lines: Vec<String> = csv.lines().map(str::to_string).collect();
        let mut cells: Vec<String> = lines[1].split(',').map(str::to_string).collect();
        cells[19].clear();
        let forged_row = cells.join(",");
        lines[1] = forged_row;
        let joined = lines.join("\n");
        assert!(read_catalog(joined.as_bytes()).is_err());
    }

    #[test]
    fn seasonal_power_survives_the_round_trip() {
        let mut values = vec![50.0; 366];
        values[180] = 35.0;
        let mut user = User::new("clinic", 1, 0).expect("valid");
        user.add_appliance(ApplianceConfig {
            name: "fridge".to_string(),
            power: PowerSeries::from_values(values).expect("valid length"),
            windows: [
                Window { start: 0, end: 1440 },
                Window::EMPTY,
                Window::EMPTY,
            ],
            func_time: 1200,
            ..ApplianceConfig::default()
        })
        .expect("valid appliance");
        let uc = UseCase::new("clinic", vec![user]);
        let csv = to_csv(&uc);
        let loaded = read_catalog(csv.as_bytes()).expect("load succeeds");
        assert_eq!(loaded.users[0].appliances[0].power.get(180), 35.0);
        assert_eq!(loaded.users[0].appliances[0].power.get(0), 50.0);
    }
}
