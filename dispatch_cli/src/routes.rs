use std::{fs::File, io::BufReader, path::PathBuf};

use clap::{Args, ValueEnum};
use comfy_table::Table;
use dispatch_routes::{
    json::types::{FromProblem, JsonBestRouteTable, JsonDispatchProblem},
    oracle::time_window_oracle::TimeWindowOracle,
    search::{
        fan_out::fan_out,
        search_params::{FanOutParams, KeyEncodingChoice, OrderingPolicy, SearchParams, Threads},
    },
    table::BestRouteTable,
};
use tracing::info;

use crate::parsers;

#[derive(Clone, Copy, ValueEnum)]
enum Ordering {
    Incremental,
    Exhaustive,
}

#[derive(Clone, Copy, ValueEnum)]
enum Encoding {
    Auto,
    Bitmask,
    SortedTuple,
}

impl From<Encoding> for KeyEncodingChoice {
    fn from(value: Encoding) -> Self {
        match value {
            Encoding::Auto => KeyEncodingChoice::Auto,
            Encoding::Bitmask => KeyEncodingChoice::Bitmask,
            Encoding::SortedTuple => KeyEncodingChoice::SortedTuple,
        }
    }
}

#[derive(Args)]
pub struct RoutesArgs {
    /// Dispatch problem JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Maximum number of orders per route (1-8)
    #[arg(short, long, default_value_t = 3)]
    level: usize,

    #[arg(long, value_enum, default_value_t = Ordering::Exhaustive)]
    ordering: Ordering,

    /// Largest subset size whose orderings are all tried in exhaustive mode
    #[arg(long, default_value_t = 5)]
    up_to: usize,

    #[arg(long, value_enum, default_value_t = Encoding::Auto)]
    encoding: Encoding,

    /// Re-check whole orderings instead of extending checked prefixes
    #[arg(long)]
    full_oracle: bool,

    /// Worker threads (default: all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Worker slices (default: one per thread)
    #[arg(short, long)]
    slices: Option<usize>,

    /// Overrides the vehicle's hand-in time (e.g. "PT3M", "3m", "3")
    #[arg(long, value_parser = parsers::parse_duration)]
    hand_in_time: Option<jiff::SignedDuration>,

    /// Overrides the problem's calculation time
    #[arg(long)]
    calc_time: Option<jiff::Timestamp>,

    /// Write the route table as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RoutesArgs {
    fn search_params(&self) -> SearchParams {
        SearchParams {
            level: self.level,
            ordering: match self.ordering {
                Ordering::Incremental => OrderingPolicy::Incremental,
                Ordering::Exhaustive => OrderingPolicy::Exhaustive { up_to: self.up_to },
            },
            key_encoding: self.encoding.into(),
            incremental_oracle: !self.full_oracle,
            ..SearchParams::default()
        }
    }

    fn fan_out_params(&self) -> FanOutParams {
        let threads = match self.threads {
            None => Threads::Auto,
            Some(1) => Threads::Single,
            Some(threads) => Threads::Multi(threads),
        };

        FanOutParams {
            slices: self.slices.unwrap_or_else(|| threads.number_of_threads()),
            threads,
        }
    }
}

pub fn run(args: RoutesArgs) -> Result<(), anyhow::Error> {
    info!("Loading dispatch problem {:?}", args.input);
    let reader = BufReader::new(File::open(&args.input)?);
    let mut json: JsonDispatchProblem = serde_json::from_reader(reader)?;

    if let Some(hand_in_time) = args.hand_in_time {
        json.vehicle.hand_in_time = Some(hand_in_time);
    }
    if let Some(calc_time) = args.calc_time {
        json.calc_time = calc_time;
    }

    let problem = json.build_problem()?;
    let params = args.search_params();
    let fan_out_params = args.fan_out_params();

    for (depth, guarantee) in params.ordering.guarantees(params.level) {
        info!("Routes of {depth} orders: {guarantee:?}");
    }

    let start = jiff::Timestamp::now();
    let report = fan_out(&problem, &TimeWindowOracle, &params, &fan_out_params)?;
    let statistics = report.statistics();
    let table = report.merged()?;
    let elapsed = jiff::Timestamp::now().duration_since(start);

    info!(
        entries = table.len(),
        oracle_calls = statistics.total_oracle_calls(),
        pruned = statistics.pruned,
        "Search finished in {elapsed:#}"
    );

    println!("{}", summary_table(&table));

    if let Some(output) = args.output {
        let json = JsonBestRouteTable::from_problem(&table, &problem);
        serde_json::to_writer_pretty(File::create(&output)?, &json)?;
        info!("Wrote {} routes to {:?}", json.routes.len(), output);
    }

    Ok(())
}

fn summary_table(table: &BestRouteTable) -> Table {
    let mut summary = Table::new();
    summary.set_header(vec!["Orders", "Subsets", "Min cost", "Max cost"]);

    for (size, count) in table.count_by_size().into_iter().enumerate().skip(1) {
        if count == 0 {
            continue;
        }

        let costs = table
            .iter()
            .filter(|entry| entry.key.len() == size)
            .map(|entry| entry.route.cost());
        let (min, max) = costs.fold((i64::MAX, i64::MIN), |(min, max), cost| {
            (min.min(cost), max.max(cost))
        });

        summary.add_row(vec![
            size.to_string(),
            count.to_string(),
            min.to_string(),
            max.to_string(),
        ]);
    }

    summary
}
