use std::error::Error;

use clap::Parser;
use env_logger;

use traffic_assignment::report;
use traffic_assignment::Scenario;


#[derive(Parser, Debug)]
#[command(about = "Assigns origin-destination demand to a road network")]
struct Args {
    /// Path to the scenario's yaml config
    config: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let scenario = Scenario::from_cfg(&args.config)?;
    let network = scenario.get_network();

    for route in report::free_flow_routes(network) {
        log::info!("free flow {}: {:.1} minutes",
                   report::path_names(network, &route.path).join(" -> "), route.travel_time);
    }

    for result in scenario.run_all()? {
        log::info!("{}: total travel time {:.1} minutes", result.algorithm.name(),
                   result.total_travel_time);
        for load in report::link_loads(network, &result.flow) {
            if load.total_flow() > 0. {
                log::info!("  {}-{}: {:.1} veh/h, v/c {:.2}",
                           network.get_node_name_by_idx(load.from).unwrap_or("?"),
                           network.get_node_name_by_idx(load.to).unwrap_or("?"),
                           load.total_flow(), load.volume_capacity_ratio());
            }
        }
        if let Some(od) = network.get_od_pairs().first() {
            let corridor = report::corridor(network, &result.flow, od.origin, od.destination);
            log::info!("  first od follows {:?} in {:.1} minutes, link flows {:?}",
                       report::path_names(network, &corridor.route.path),
                       corridor.route.travel_time, corridor.link_flows);
        }
        for summary in report::route_summaries(network, &result.flow) {
            log::debug!("  od {} -> {} ({:.1} veh/h): {:.1} minutes via {:?}",
                        summary.od.origin, summary.od.destination, summary.od.demand,
                        summary.route.travel_time,
                        report::path_names(network, &summary.route.path));
        }
    }
    Ok(())
}
