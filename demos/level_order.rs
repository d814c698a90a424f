use balanced_tree::{BalancedTree, TreeError};

fn main() -> Result<(), TreeError> {
    let mut tree = BalancedTree::new();
    for key in 1..=6 {
        tree.insert(key, key.to_string())?;
    }

    println!("Level-order traversal:");
    tree.traverse_level_order(|k, v| {
        println!("Key: {}, Value: {}", k, v);
    });

    tree.remove(&1)?;
    if let Err(err) = tree.remove(&1) {
        println!("Removing 1 again: {err}");
    }

    for (k, v) in &tree {
        println!("{k} => {v}");
    }
    Ok(())
}
