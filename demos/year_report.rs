use anyhow::{bail, Context, Result};
use expense_dashboard::{Dashboard, DensifyMode, YearSelection};

fn parse_selection(arg: &str) -> Result<YearSelection> {
    if arg.eq_ignore_ascii_case("all") {
        return Ok(YearSelection::AllYears);
    }
    let year: i32 = arg
        .parse()
        .with_context(|| format!("'{}' is neither a year nor 'all'", arg))?;
    Ok(YearSelection::Year(year))
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: year_report <invoices.csv> [year|all] [--observed-pairs]");
    };

    let mut selection = None;
    let mut mode = DensifyMode::GlobalMonths;
    for arg in args {
        if arg == "--observed-pairs" {
            mode = DensifyMode::ObservedPairs;
        } else {
            selection = Some(parse_selection(&arg)?);
        }
    }

    let dashboard = Dashboard::from_path(&path)
        .with_context(|| format!("loading {}", path))?
        .with_densify_mode(mode);

    let selection = match selection {
        Some(selection) => selection,
        None => match dashboard.default_year() {
            Some(year) => YearSelection::Year(year),
            None => bail!("{} contains no records", path),
        },
    };

    let view = dashboard.view(selection);
    let metrics = &view.metrics;

    eprintln!("Years available: {:?}", dashboard.year_options());
    eprintln!("Selection: {}", selection);
    eprintln!("Total Expenditure: S$ {:.2}", metrics.total_expenditure);
    eprintln!("Total Number of Orders: {}", metrics.order_count);
    match &metrics.top_expense {
        Some(top) => eprintln!("Most Expensive Purchase: {} (S$ {:.2})", top.vendor, top.value),
        None => eprintln!("Most Expensive Purchase: n/a"),
    }
    match (metrics.average_processing_days, metrics.max_processing_days) {
        (Some(avg), Some(max)) => {
            eprintln!("Average Invoice Processing Time: {:.2} days", avg);
            eprintln!("Longest Invoice Processing Time: {} days", max);
        }
        _ => eprintln!("Invoice Processing Time: n/a"),
    }

    println!("{}", view.to_json()?);
    Ok(())
}
