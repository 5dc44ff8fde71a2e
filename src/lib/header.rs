//! @PG provenance for output headers.
//!
//! The output BAM carries the input header plus one pairec @PG record. The
//! new record chains to the tail of the existing @PG chain via PP and gets
//! a numeric suffix when the base ID is already taken.

use anyhow::Result;
use bstr::BString;
use noodles::sam::Header;
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::Program;
use noodles::sam::header::record::value::map::program::tag;

/// Program name recorded in @PG entries.
const PROGRAM_NAME: &str = "pairec";

/// Appends a pairec @PG record with version and command line.
///
/// # Errors
///
/// Returns an error if the program record cannot be built or added.
pub fn add_pg_record(mut header: Header, version: &str, command_line: &str) -> Result<Header> {
    let mut builder = Map::<Program>::builder()
        .insert(tag::NAME, PROGRAM_NAME)
        .insert(tag::VERSION, version)
        .insert(tag::COMMAND_LINE, command_line);

    if let Some(tail) = chain_tail(&header) {
        builder = builder.insert(tag::PREVIOUS_PROGRAM_ID, tail.as_slice());
    }

    let id = unique_program_id(&header);
    header.programs_mut().add(id, builder.build()?)?;

    Ok(header)
}

/// ID of the @PG record no other record references via PP, i.e. the tail of
/// the chain the new record should link to.
fn chain_tail(header: &Header) -> Option<BString> {
    let programs = header.programs().as_ref();

    let referenced: Vec<&[u8]> = programs
        .values()
        .filter_map(|pg| pg.other_fields().get(&tag::PREVIOUS_PROGRAM_ID))
        .map(AsRef::as_ref)
        .collect();

    programs
        .keys()
        .find(|id| !referenced.contains(&id.as_slice()))
        .or_else(|| programs.keys().next())
        .cloned()
}

/// The base program name, suffixed with `.1`, `.2`, ... on collision.
fn unique_program_id(header: &Header) -> BString {
    let programs = header.programs().as_ref();
    if !programs.contains_key(PROGRAM_NAME.as_bytes()) {
        return BString::from(PROGRAM_NAME);
    }
    let n = (1..)
        .find(|i| !programs.contains_key(format!("{PROGRAM_NAME}.{i}").as_bytes()))
        .unwrap_or(1);
    BString::from(format!("{PROGRAM_NAME}.{n}"))
}
