use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use log::info;
use mzpeaks::Tolerance;

use mzisotope::deisotope::{Deisotoper, DeisotopingParameters, ISO_PEAK_COUNT_ARRAY};
use mzisotope::prelude::*;
use mzisotope::spectrum::{ArrayType, Precursor, SelectedIon};

/// Deisotope a centroided peak list stored as whitespace separated m/z and
/// intensity columns, writing m/z, intensity, charge, and isotopic peak count.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The peak list to read, or `-` for STDIN
    input: PathBuf,

    /// The matching tolerance for isotopic peaks
    #[arg(short = 't', long, default_value_t = 10.0)]
    tolerance: f64,

    /// Interpret the tolerance in Daltons instead of PPM
    #[arg(long, default_value_t = false)]
    dalton: bool,

    #[arg(long, default_value_t = 1)]
    min_charge: i32,

    #[arg(long, default_value_t = 3)]
    max_charge: i32,

    #[arg(long, default_value_t = 3)]
    min_isotopic_peaks: usize,

    #[arg(long, default_value_t = 10)]
    max_isotopic_peaks: usize,

    /// Drop peaks that were not assigned as monoisotopic peaks
    #[arg(short = 'k', long, default_value_t = false)]
    keep_only_deisotoped: bool,

    /// Keep monoisotopic peaks at their observed m/z
    #[arg(long, default_value_t = false)]
    no_single_charge: bool,

    /// Sum the intensities of each isotopic series onto its monoisotopic peak
    #[arg(long, default_value_t = false)]
    add_up_intensity: bool,

    /// The precursor m/z, used with `--precursor-charge` to bound the charge search
    #[arg(long)]
    precursor_mz: Option<f64>,

    #[arg(long)]
    precursor_charge: Option<i32>,
}

fn read_peaks<R: BufRead>(reader: R) -> io::Result<RawSpectrum> {
    let mut mzs = Vec::new();
    let mut intensities = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let (Some(mz), Some(inten)) = (tokens.next(), tokens.next()) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Line {} does not have two columns", lineno + 1),
            ));
        };
        let parse_err = |e: std::num::ParseFloatError| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Line {}: {e}", lineno + 1),
            )
        };
        mzs.push(mz.parse::<f64>().map_err(parse_err)?);
        intensities.push(inten.parse::<f64>().map_err(parse_err)?);
    }
    RawSpectrum::from_arrays(&mzs, &intensities)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut spectrum = if args.input.as_os_str() == "-" {
        read_peaks(io::stdin().lock())?
    } else {
        read_peaks(io::BufReader::new(fs::File::open(&args.input)?))?
    };
    spectrum.sort_by_mz()?;
    if let Some(mz) = args.precursor_mz {
        spectrum = spectrum.with_precursor(Precursor::new(SelectedIon::new(mz, args.precursor_charge)));
    }

    let tolerance = if args.dalton {
        Tolerance::Da(args.tolerance)
    } else {
        Tolerance::PPM(args.tolerance)
    };
    let params = DeisotopingParameters::new(tolerance, args.min_charge, args.max_charge)
        .with_isotopic_peak_range(args.min_isotopic_peaks, args.max_isotopic_peaks)
        .with_keep_only_deisotoped(args.keep_only_deisotoped)
        .with_make_single_charged(!args.no_single_charge)
        .with_add_up_intensity(args.add_up_intensity)
        .with_annotations(true, true);

    let deisotoper =
        Deisotoper::new(params).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let summary = deisotoper
        .deisotope(&mut spectrum)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    info!(
        "{} peaks in, {} features, {} peaks out",
        summary.input_peaks, summary.features, summary.output_peaks
    );

    let mzs = spectrum.mzs()?;
    let intensities = spectrum.intensities()?;
    let charges = spectrum.arrays.charges()?;
    let counts = spectrum
        .arrays
        .get(&ArrayType::nonstandard(ISO_PEAK_COUNT_ARRAY))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing isotopic peak counts"))?
        .to_i32()?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    writeln!(out, "mz\tintensity\tcharge\tiso_peak_count")?;
    for i in 0..mzs.len() {
        writeln!(
            out,
            "{:.6}\t{:.2}\t{}\t{}",
            mzs[i], intensities[i], charges[i], counts[i]
        )?;
    }
    out.flush()?;
    Ok(())
}
