use dynamic_connectivity::LevelStructure;

fn link(g: &mut LevelStructure<u32>, u: u32, v: u32) {
    println!("Adding edge from {} to {}", u, v);
    g.link(u, v);
}

fn cut(g: &mut LevelStructure<u32>, u: u32, v: u32) {
    println!("Removing edge from {} to {}", u, v);
    g.cut(u, v);
}

fn connected(g: &mut LevelStructure<u32>, u: u32, v: u32) {
    println!(
        "Are {} and {} connected? {}",
        u,
        v,
        if g.connected(u, v) { "Yes" } else { "No" }
    );
}

fn main() {
    let mut g: LevelStructure<u32> = LevelStructure::new();
    for u in 0..9 {
        link(&mut g, u, u + 1);
    }
    println!("Created a path of length 10 (vertices 0 to 9)");
    connected(&mut g, 0, 9);
    link(&mut g, 7, 2);
    println!("Added a chord from 7 to 2, creating a cycle among 2..=7");
    cut(&mut g, 4, 5);
    connected(&mut g, 4, 5);
    println!("(the chord through 7-2 still connects them)");
    cut(&mut g, 2, 7);
    connected(&mut g, 4, 5);
    println!("(no replacement edge remains, so 4 and 5 are now split)");
    connected(&mut g, 0, 9);
}
