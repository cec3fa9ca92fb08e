use anyhow::Result;
use linalg::Vector;

fn main() -> Result<()> {
    env_logger::init();

    let vec1 = Vector::filled(3, 1.0_f64);
    let vec2 = Vector::<f64>::with_size(3);
    let data = vec![1.0, 2.0, 3.0];
    let vec3 = Vector::new(data.as_slice());
    let vec4 = vec1.clone();

    vec1.print();
    vec2.print();
    vec3.print();
    vec4.print();

    Ok(())
}
