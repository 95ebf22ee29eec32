use std::error::Error;
use std::path::{Path, PathBuf};

use itertools::iproduct;
use itertools::Itertools;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_isaac::Isaac64Rng;
use yaml_rust::Yaml;
use yaml_rust::YamlLoader;

use super::assignment::{self, Algorithm, AssignmentParams};
use super::config_utils;
use super::loaders;
use super::network::{DemandSpec, FlowMatrix, LinkSpec, NodeSpec, RoadNetwork};


static DEFAULT_RAND_SEED: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct GridCityConfig {
    // the number of intersections in each direction
    pub num_x_nodes: usize,
    pub num_y_nodes: usize,
    // side length of the square city
    pub city_size: f64,
    pub capacity: f64,
    pub speed_max: f64,
    // total demand spread over all the od pairs
    pub total_demand: f64,
    pub num_od_pairs: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkSource {
    Dataset { network_path: PathBuf, demand_path: PathBuf },
    GridCity(GridCityConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub source: NetworkSource,
    pub params: AssignmentParams,
}

fn required_i64(yaml_cfg: &Yaml, key: &str) -> Result<i64, Box<dyn Error>> {
    match yaml_cfg[key].as_i64() {
        Some(val) => Ok(val),
        None => Err(format!("config is missing integer '{}'", key).into()),
    }
}

fn required_usize(yaml_cfg: &Yaml, key: &str) -> Result<usize, Box<dyn Error>> {
    let val = required_i64(yaml_cfg, key)?;
    if val < 0 {
        return Err(format!("'{}' must not be negative", key).into());
    }
    Ok(val as usize)
}

// yaml reads "1000" as an integer
fn required_f64(yaml_cfg: &Yaml, key: &str) -> Result<f64, Box<dyn Error>> {
    if let Yaml::Integer(val) = &yaml_cfg[key] {
        return Ok(*val as f64);
    }
    match yaml_cfg[key].as_f64() {
        Some(val) => Ok(val),
        None => Err(format!("config is missing number '{}'", key).into()),
    }
}

fn required_str<'a>(yaml_cfg: &'a Yaml, key: &str) -> Result<&'a str, Box<dyn Error>> {
    match yaml_cfg[key].as_str() {
        Some(val) => Ok(val),
        None => Err(format!("config is missing string '{}'", key).into()),
    }
}

impl GridCityConfig {
    fn from_yaml(yaml_cfg: &Yaml) -> Result<GridCityConfig, Box<dyn Error>> {
        Ok(GridCityConfig {
            num_x_nodes: required_usize(yaml_cfg, "num_x_nodes")?,
            num_y_nodes: required_usize(yaml_cfg, "num_y_nodes")?,
            city_size: required_f64(yaml_cfg, "city_size")?,
            capacity: required_f64(yaml_cfg, "capacity")?,
            speed_max: required_f64(yaml_cfg, "speed_max")?,
            total_demand: required_f64(yaml_cfg, "total_demand")?,
            num_od_pairs: required_usize(yaml_cfg, "num_od_pairs")?,
            seed: if yaml_cfg["seed"].is_badvalue() {
                DEFAULT_RAND_SEED
            } else {
                required_usize(yaml_cfg, "seed")? as u64
            },
        })
    }
}

impl ScenarioConfig {
    pub fn from_yaml(yaml_cfg: &Yaml, config_dir: &Path) -> Result<ScenarioConfig, Box<dyn Error>> {
        let source = if !yaml_cfg["grid_city"].is_badvalue() {
            NetworkSource::GridCity(GridCityConfig::from_yaml(&yaml_cfg["grid_city"])?)
        } else if !yaml_cfg["dataset"].is_badvalue() {
            let dataset_cfg = &yaml_cfg["dataset"];
            let network_path = required_str(dataset_cfg, "network_path")?;
            let demand_path = required_str(dataset_cfg, "demand_path")?;
            NetworkSource::Dataset {
                network_path: config_utils::str_to_absolute_path(network_path, config_dir),
                demand_path: config_utils::str_to_absolute_path(demand_path, config_dir),
            }
        } else {
            return Err("config must have either a 'grid_city' or a 'dataset' section".into());
        };

        let mut params = AssignmentParams::default();
        let assignment_cfg = &yaml_cfg["assignment"];
        if !assignment_cfg.is_badvalue() {
            if !assignment_cfg["increments"].is_badvalue() {
                params.increments = required_usize(assignment_cfg, "increments")?;
            }
            if !assignment_cfg["max_iterations"].is_badvalue() {
                params.max_iterations = required_usize(assignment_cfg, "max_iterations")?;
            }
            if !assignment_cfg["convergence_threshold"].is_badvalue() {
                params.convergence_threshold =
                    required_f64(assignment_cfg, "convergence_threshold")?;
            }
        }
        for alg in Algorithm::all_from_params(&params) {
            alg.validate()?;
        }

        Ok(ScenarioConfig {source, params})
    }

    pub fn from_yaml_str(contents: &str, config_dir: &Path)
                         -> Result<ScenarioConfig, Box<dyn Error>> {
        let yaml_cfgs = YamlLoader::load_from_str(contents)?;
        match yaml_cfgs.get(0) {
            Some(yaml_cfg) => ScenarioConfig::from_yaml(yaml_cfg, config_dir),
            None => Err("config file is empty".into()),
        }
    }

    pub fn from_file(config_path: &Path) -> Result<ScenarioConfig, Box<dyn Error>> {
        let file_contents = std::fs::read_to_string(config_path)?;
        let config_dir = match config_path.parent() {
            Some(dir) => dir,
            None => Path::new("."),
        };
        ScenarioConfig::from_yaml_str(&file_contents, config_dir)
    }
}


#[derive(Debug, Clone)]
pub struct AlgorithmResult {
    pub algorithm: Algorithm,
    pub flow: FlowMatrix,
    pub total_travel_time: f64,
}

pub struct Scenario {
    network: RoadNetwork,
    params: AssignmentParams,
}

impl Scenario {
    pub fn new(network: RoadNetwork, params: AssignmentParams) -> Scenario {
        Scenario {network, params}
    }

    pub fn from_cfg(config_path_str: &str) -> Result<Scenario, Box<dyn Error>> {
        let config = ScenarioConfig::from_file(Path::new(config_path_str))?;
        Scenario::from_config(&config)
    }

    pub fn from_config(config: &ScenarioConfig) -> Result<Scenario, Box<dyn Error>> {
        let (nodes, links, demand) = match &config.source {
            NetworkSource::Dataset { network_path, demand_path } => {
                let (nodes, links) = loaders::network_from_xml(network_path)?;
                let demand = loaders::demand_from_csv(demand_path)?;
                (nodes, links, demand)
            }
            NetworkSource::GridCity(grid_cfg) => {
                let mut rng = Isaac64Rng::seed_from_u64(grid_cfg.seed);
                generate_grid_city(grid_cfg, &mut rng)?
            }
        };
        let network = RoadNetwork::new(nodes, &links, &demand)?;
        Ok(Scenario::new(network, config.params))
    }

    pub fn get_network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn get_params(&self) -> &AssignmentParams {
        &self.params
    }

    pub fn run_all(&self) -> Result<Vec<AlgorithmResult>, Box<dyn Error>> {
        let mut results = vec![];
        for algorithm in Algorithm::all_from_params(&self.params) {
            let flow = assignment::run(&self.network, &algorithm)?;
            let total_travel_time = self.network.total_travel_time(&flow);
            results.push(AlgorithmResult {algorithm, flow, total_travel_time});
        }
        Ok(results)
    }
}


pub fn generate_grid_city<RR>(cfg: &GridCityConfig, rng: &mut RR)
                              -> Result<(Vec<NodeSpec>, Vec<LinkSpec>, Vec<DemandSpec>),
                                        Box<dyn Error>>
                              where RR: Rng {
    if cfg.num_x_nodes == 0 || cfg.num_y_nodes == 0 {
        return Err("grid city needs at least one node in each direction".into());
    }
    let inter_x_dist = cfg.city_size / cfg.num_x_nodes as f64;
    let inter_y_dist = cfg.city_size / cfg.num_y_nodes as f64;
    let get_name = |x_idx: usize, y_idx: usize| format!("{}_{}", x_idx, y_idx);

    let mut nodes = vec![];
    let mut links = vec![];
    for (y_idx, x_idx) in iproduct!(0..cfg.num_y_nodes, 0..cfg.num_x_nodes) {
        let name = get_name(x_idx, y_idx);
        nodes.push(NodeSpec::new(&name, inter_x_dist * x_idx as f64,
                                 inter_y_dist * y_idx as f64));
        // links are undirected, so only connect back to nodes that already exist
        if 0 < x_idx {
            links.push(LinkSpec::new(&get_name(x_idx - 1, y_idx), &name, cfg.capacity,
                                     cfg.speed_max));
        }
        if 0 < y_idx {
            links.push(LinkSpec::new(&get_name(x_idx, y_idx - 1), &name, cfg.capacity,
                                     cfg.speed_max));
        }
    }

    // sample od pairs without replacement
    let mut node_pairs: Vec<Vec<usize>> = (0..nodes.len()).permutations(2).collect();
    node_pairs.shuffle(rng);
    let num_od_pairs = cfg.num_od_pairs.min(node_pairs.len());
    let rands: Vec<f64> = (0..num_od_pairs).map(|_| rng.gen()).collect();
    let total: f64 = rands.iter().sum();

    let mut demand = vec![];
    for (rr, pair) in rands.iter().zip(node_pairs.iter()) {
        let amount = if total > 0. { rr * cfg.total_demand / total } else { 0. };
        demand.push(DemandSpec::new(&nodes[pair[0]].name, &nodes[pair[1]].name, amount));
    }

    Ok((nodes, links, demand))
}
