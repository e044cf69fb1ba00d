use std::collections::HashMap;

pub struct CliOptions {
    pub obj_file: Option<String>,
    pub out_file: String,
    pub width: u32,
    pub height: u32,
    pub bounces: u32,
    pub fov_degrees: f32,
    pub use_gpu: bool,
    pub cam_pos: (f32, f32, f32),
    pub cam_front: (f32, f32, f32),
    pub background: (f32, f32, f32),
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            obj_file: None,
            out_file: String::from("render.png"),
            width: 1024,
            height: 1024,
            bounces: 0,
            fov_degrees: 40.0,
            use_gpu: false,
            // The reflect.obj viewpoint: looking down-left from high up.
            cam_pos: (40.0, 10.0, -8.0),
            cam_front: (-1.0, -0.15, 0.2),
            background: (0.0, 0.3, 0.28),
        }
    }
}

impl CliOptions {
    pub fn message() -> &'static str {
        r#"
        --obj <file.obj>          mesh to render (required)
        --out <file.png>          output image path (default render.png)
        --width <n> --height <n>  image size in pixels (default 1024)
        --bounces <0|1|2>         reflection depth; larger values behave as 2
        --fov <degrees>           vertical field of view (default 40)
        --gpu | --cpu             execution backend (default cpu)
        --cam_pos <x,y,z>         camera position
        --cam_front <x,y,z>       camera viewing direction
        --bg <r,g,b>              background color, channels in [0, 1]
        "#
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or(format!("{} expects a value", key))?;
    value
        .parse::<T>()
        .map_err(|_| format!("{} expects a number, got {:?}", key, value))
}

fn parse_triple(key: &str, value: Option<String>) -> Result<(f32, f32, f32), String> {
    let value = value.ok_or(format!("{} expects a value", key))?;
    let components = value
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<Result<Vec<f32>, _>>()
        .map_err(|_| format!("{} expects x,y,z numbers, got {:?}", key, value))?;
    match components.as_slice() {
        [x, y, z] => Ok((*x, *y, *z)),
        _ => Err(format!("{} expects exactly 3 components, got {:?}", key, value)),
    }
}

pub fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut pairs: HashMap<String, Option<String>> = HashMap::new();
    let mut args = args.into_iter().rev().collect::<Vec<_>>();
    args.pop(); // Removes args[0]

    while let Some(key) = args.pop() {
        if !key.starts_with('-') {
            return Err(format!("Unrecognized key {}", key));
        }
        match args.last() {
            None => {
                pairs.insert(key, None);
            }
            Some(value) => {
                // Only "--" marks the next flag; a leading single '-' may be
                // a negative number, as in --cam_front -1,-0.15,0.2.
                if value.starts_with("--") {
                    pairs.insert(key, None);
                } else {
                    let value = args.pop();
                    pairs.insert(key, value);
                }
            }
        }
    }
    let mut options = CliOptions::default();
    for (k, v) in pairs.into_iter() {
        match k.as_str() {
            "--obj" => options.obj_file = v,
            "--out" => options.out_file = v.ok_or("--out expects a path")?,
            "--width" => options.width = parse_number(&k, v)?,
            "--height" => options.height = parse_number(&k, v)?,
            "--bounces" => options.bounces = parse_number(&k, v)?,
            "--fov" => options.fov_degrees = parse_number(&k, v)?,
            "--gpu" => options.use_gpu = true,
            "--cpu" => options.use_gpu = false,
            "--cam_pos" => options.cam_pos = parse_triple(&k, v)?,
            "--cam_front" => options.cam_front = parse_triple(&k, v)?,
            "--bg" => options.background = parse_triple(&k, v)?,
            "--help" => {
                println!("usage: {}", CliOptions::message());
            }
            _ => return Err(format!("Unrecognized key {}", k)),
        }
    }
    // The normalized pixel coordinate divides by (side - 1).
    if options.width < 2 || options.height < 2 {
        return Err(String::from("--width and --height must be at least 2"));
    }
    Ok(options)
}
