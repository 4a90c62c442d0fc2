use ising_scan::config::SimConfig;
use ising_scan::measure::TimeSeries;
use ising_scan::report::{CsvReporter, Reporter};
use ising_scan::sweep::TemperatureSweep;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ising_scan_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_csv_reporter_writes_series_and_sweep() {
    let cfg = SimConfig {
        n_sites: 16,
        n_iter:  300,
        t_equil: 200,
        n_temps: 8,
        ..SimConfig::default()
    };
    let dir = scratch_dir("csv_reporter");
    let mut reporter = CsvReporter::new(&dir).unwrap();

    let sweep = TemperatureSweep::new(cfg.clone()).unwrap();
    let result = sweep.run(&mut ChaCha20Rng::seed_from_u64(21), &mut reporter).unwrap();

    for label in 1..=3 {
        let path = reporter.evolution_path(label);
        assert_eq!(path, dir.join(format!("evolution_{label}.csv")));

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, ["t", "energy", "magnetization", "T", "T_over_Tc"]);

        let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), cfg.n_iter);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(rows[cfg.n_iter - 1][0].parse::<usize>().unwrap(), cfg.n_iter - 1);
    }
    assert!(!reporter.evolution_path(4).exists());

    assert_eq!(reporter.sweep_path(), dir.join("sweep.csv"));
    let mut rdr = csv::Reader::from_path(reporter.sweep_path()).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(
        headers,
        [
            "T", "T_over_Tc", "beta", "energy", "energy_err", "energy_jack_err",
            "magnetization", "magnetization_err", "magnetization_jack_err",
            "abs_magnetization", "specific_heat", "susceptibility", "binder", "acceptance",
        ]
    );

    let rows: Vec<csv::StringRecord> = rdr.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(rows.len(), cfg.n_temps);
    for (row, point) in rows.iter().zip(&result.points) {
        assert_eq!(row[0].parse::<f64>().unwrap(), point.temperature);
        assert_eq!(row[3].parse::<f64>().unwrap(), point.energy);
        assert_eq!(row[6].parse::<f64>().unwrap(), point.magnetization);
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_csv_reporter_creates_missing_directory() {
    let dir = scratch_dir("nested").join("a").join("b");
    assert!(!dir.exists());

    let mut reporter = CsvReporter::new(&dir).unwrap();
    assert!(dir.is_dir());

    let series = TimeSeries::filled(3, 0.5);
    reporter.time_series(7, 1.0, 2.0, &series).unwrap();

    let text = fs::read_to_string(reporter.evolution_path(7)).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "0,0.5,0.5,1,0.5");

    fs::remove_dir_all(dir.parent().unwrap().parent().unwrap()).unwrap();
}
