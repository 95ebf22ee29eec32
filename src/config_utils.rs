use std::error::Error;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use xml::attribute::OwnedAttribute;


pub fn get_xml_attribute_value(attributes: &Vec<OwnedAttribute>, attr_name: &str)
                               -> Option<String> {
    match attributes.iter().find(|attr| attr.name.local_name == attr_name) {
        Some(attr) => Some(attr.value.clone()),
        None => None,
    }
}

/// Parses a mandatory attribute of an element, naming the element and attribute on failure.
pub fn parse_xml_attribute<T>(attributes: &Vec<OwnedAttribute>, elem_name: &str, attr_name: &str)
                              -> Result<T, Box<dyn Error>>
    where T: FromStr,
          T::Err: Error + 'static,
{
    let value = match get_xml_attribute_value(attributes, attr_name) {
        Some(value) => value,
        None => return Err(format!("<{}> is missing attribute '{}'", elem_name, attr_name).
                               into()),
    };
    Ok(value.trim().parse::<T>()?)
}

pub fn str_to_absolute_path(path_str: &str, default_base_dir: &Path) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        return path;
    } else {
        return [default_base_dir, Path::new(&path)].iter().collect();
    }
}
