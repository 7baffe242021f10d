use std::env;

use nwm_show_rust::caller_id;
use nwm_show_rust::data_io::{
    append_jsons, create_default_file_list, DatasetSource, FileListParams, NetcdfSource, NwmGeo,
    NwmRun, NwmVar,
};
use nwm_show_rust::show;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [local_channel_rt.nc]", args[0]);
        std::process::exit(1);
    }

    // Resolve the channel-routing references for one date, one cycle, one
    // lead time
    let params = FileListParams::new(
        NwmRun::ShortRange,
        NwmVar::ChannelRt,
        NwmGeo::Conus,
        None,
        "202301010000",
        "202301010000",
        vec![0],
        vec![1],
    )?;
    let routing_files = create_default_file_list(&params)?;
    // Append the .json suffix to make the references loadable via kerchunk
    let routing_files = append_jsons(&routing_files);

    println!("Resolved {} routing file reference(s)", routing_files.len());
    println!("Routing file: {}", routing_files[0]);

    // Optionally inspect a locally mirrored channel routing file
    if args.len() == 2 {
        let caller = caller_id!();

        match NetcdfSource.load(&args[1]) {
            Ok(dataset) => {
                println!("✓ Successfully opened channel routing dataset");
                show(&caller, &dataset, Some("Channel routing dataset"))?;

                match dataset.variable_values("streamflow") {
                    Ok(streamflow) => {
                        let peak = streamflow
                            .iter()
                            .cloned()
                            .fold(f64::NEG_INFINITY, f64::max);
                        let summary = serde_json::json!({
                            "variable": "streamflow",
                            "points": streamflow.len(),
                            "peak": peak,
                        });
                        show(&caller, summary, Some("Streamflow summary"))?;
                    }
                    Err(error) => {
                        println!("✗ Error reading streamflow: {}", error);
                    }
                }
            }
            Err(error) => {
                println!("✗ Failed to open channel routing dataset: {}", error);
            }
        }
    } else {
        println!("Pass a locally mirrored .nc file to inspect its contents.");
    }

    Ok(())
}
