use std::collections::HashMap;
use std::collections::HashSet;
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use xml::reader::{EventReader, XmlEvent};

use super::config_utils;
use super::network::{DemandSpec, LinkSpec, NodeSpec};


// A convenience type for parsing csv data
type Row = HashMap<String, String>;

/// Reads nodes and links from a network xml file of the form
/// `<network><nodes><node id x y/>...</nodes><links><link from to capacity speedmax/>...</links>
/// </network>`.
pub fn network_from_xml(xml_path: &Path) -> Result<(Vec<NodeSpec>, Vec<LinkSpec>), Box<dyn Error>> {
    let file = File::open(xml_path)?;
    network_from_reader(file)
}

pub fn network_from_reader<R: Read>(reader: R)
                                    -> Result<(Vec<NodeSpec>, Vec<LinkSpec>), Box<dyn Error>> {
    let mut parser = EventReader::new(reader);
    let mut nodes = vec![];
    let mut links = vec![];
    let mut seen_names = HashSet::new();
    loop {
        match parser.next()? {
            XmlEvent::StartElement{ name, attributes, .. } => {
                if name.local_name == "node" {
                    let id: String = config_utils::parse_xml_attribute(&attributes, "node", "id")?;
                    let xpos: f64 = config_utils::parse_xml_attribute(&attributes, "node", "x")?;
                    let ypos: f64 = config_utils::parse_xml_attribute(&attributes, "node", "y")?;
                    if !xpos.is_finite() || !ypos.is_finite() {
                        return Err(format!("node {} has non-finite coordinates", id).into());
                    }
                    if !seen_names.insert(id.clone()) {
                        return Err(format!("node {} is defined twice", id).into());
                    }
                    nodes.push(NodeSpec::new(&id, xpos, ypos));
                } else if name.local_name == "link" {
                    let from: String =
                        config_utils::parse_xml_attribute(&attributes, "link", "from")?;
                    let to: String = config_utils::parse_xml_attribute(&attributes, "link", "to")?;
                    let capacity: f64 =
                        config_utils::parse_xml_attribute(&attributes, "link", "capacity")?;
                    let speed_max: f64 =
                        config_utils::parse_xml_attribute(&attributes, "link", "speedmax")?;
                    if !(capacity > 0.) {
                        return Err(format!("link {}-{} has non-positive capacity {}", from, to,
                                           capacity).into());
                    }
                    if !(speed_max > 0.) {
                        return Err(format!("link {}-{} has non-positive speed limit {}", from, to,
                                           speed_max).into());
                    }
                    links.push(LinkSpec::new(&from, &to, capacity, speed_max));
                }
            }
            XmlEvent::EndDocument => {
                log::info!("Reached end of network xml");
                break;
            }
            _ => (),
        }
    }
    log::debug!("read {} nodes and {} links", nodes.len(), links.len());
    Ok((nodes, links))
}

pub fn demand_from_csv(csv_path: &Path) -> Result<Vec<DemandSpec>, Box<dyn Error>> {
    let file = File::open(csv_path)?;
    demand_from_reader(file)
}

pub fn demand_from_reader<R: Read>(reader: R) -> Result<Vec<DemandSpec>, Box<dyn Error>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut demands = vec![];
    for result in reader.deserialize() {
        let row: Row = result?;
        let field = |key: &str| match row.get(key) {
            Some(value) => Ok(value.as_str()),
            None => Err(format!("demand row is missing column '{}'", key)),
        };
        let from = field("from")?;
        let to = field("to")?;
        let amount: f64 = field("amount")?.parse()?;
        if !(amount >= 0.) {
            return Err(format!("demand from {} to {} is negative: {}", from, to, amount).into());
        }
        demands.push(DemandSpec::new(from, to, amount));
    }
    Ok(demands)
}
