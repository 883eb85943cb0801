//! Integration tests for the in-memory ledger.

use neo_core::{UInt160, UInt256};
use neo_cryptography::{verification_script_hash, ECPoint};
use neo_ledger::{
    Account, Asset, AssetType, Attribute, AttributeUsage, Block, Blockchain, ConsensusPayload,
    Contract, HashOrIndex, Header, Input, LedgerError, MemoryBlockchain, Output, ScriptContainer,
    StorageItem, Transaction, Validator,
};
use p256::ecdsa::SigningKey;

fn test_public_key(seed: u8) -> ECPoint {
    let signing_key = SigningKey::from_slice(&[seed; 32]).unwrap();
    let encoded = signing_key.verifying_key().to_encoded_point(true);
    ECPoint::from_bytes(encoded.as_bytes()).unwrap()
}

fn test_asset(hash: UInt256, asset_type: AssetType) -> Asset {
    Asset {
        hash,
        asset_type,
        name: "test".to_string(),
        amount: 100,
        available: 0,
        precision: 8,
        owner: test_public_key(1),
        admin: UInt160::zero(),
        issuer: UInt160::zero(),
        expiration: 2_000_001,
        is_frozen: false,
    }
}

#[test]
fn test_genesis_block() {
    let chain = MemoryBlockchain::default();
    assert_eq!(chain.current_block().index, 0);
    let genesis = chain.get_header(&HashOrIndex::Index(0)).unwrap();
    assert_eq!(genesis.hash(), chain.current_block().hash());
    assert!(chain.try_get_header(&HashOrIndex::Index(1)).is_none());
}

#[test]
fn test_persist_block_links_headers() {
    let mut chain = MemoryBlockchain::default();
    let genesis_hash = chain.current_block().hash();
    let tx = Transaction::invocation(vec![0x51]);
    let tx_hash = tx.hash();

    let hash = chain.persist_block(Block::new(Header::default(), vec![tx.clone()]));

    assert_eq!(chain.current_block().index, 1);
    assert_eq!(chain.current_block().prev_hash, genesis_hash);
    assert_eq!(chain.get_block(&HashOrIndex::Hash(hash)).unwrap().index(), 1);
    assert_eq!(chain.get_transaction(&tx_hash).unwrap(), tx);
    assert_eq!(chain.try_get_transaction_height(&tx_hash), Some(1));
}

#[test]
fn test_outputs_and_spent_inputs() {
    let mut chain = MemoryBlockchain::default();
    let address = UInt160([7u8; 20]);
    let funding = Transaction::contract(
        Vec::new(),
        vec![Output {
            asset: UInt256::zero(),
            value: 10,
            address,
        }],
    );
    let input = Input {
        prev_hash: funding.hash(),
        prev_index: 0,
    };
    chain.persist_block(Block::new(Header::default(), vec![funding]));
    assert_eq!(chain.get_output(&input).unwrap().address, address);
    assert!(!chain.is_spent(&input));

    let spend = Transaction::contract(vec![input], Vec::new());
    chain.persist_block(Block::new(Header::default(), vec![spend]));
    assert!(chain.is_spent(&input));
}

#[test]
fn test_missing_entities_are_not_found() {
    let chain = MemoryBlockchain::default();
    let err = chain.get_contract(&UInt160::zero()).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { kind: "Contract", .. }));
    assert!(chain.get_asset(&UInt256::zero()).is_err());
    assert!(chain.get_account(&UInt160::zero()).is_err());
}

#[test]
fn test_storage_find_by_prefix() {
    let mut chain = MemoryBlockchain::default();
    let owner = UInt160([1u8; 20]);
    let other = UInt160([2u8; 20]);
    chain
        .add_storage(StorageItem::new(owner, vec![0x01, 0x02], vec![1]))
        .unwrap();
    chain
        .add_storage(StorageItem::new(owner, vec![0x01, 0x01], vec![2]))
        .unwrap();
    chain
        .add_storage(StorageItem::new(owner, vec![0x02], vec![3]))
        .unwrap();
    chain
        .add_storage(StorageItem::new(other, vec![0x01, 0x00], vec![4]))
        .unwrap();

    let found = chain.find_storage(&owner, &[0x01]);
    let keys: Vec<_> = found.iter().map(|item| item.key.clone()).collect();
    assert_eq!(keys, vec![vec![0x01, 0x01], vec![0x01, 0x02]]);
    assert_eq!(chain.find_storage(&owner, &[]).len(), 3);
    assert_eq!(chain.storage_len(&owner), 3);
}

#[test]
fn test_storage_add_update_delete() {
    let mut chain = MemoryBlockchain::default();
    let owner = UInt160([1u8; 20]);
    let item = StorageItem::new(owner, b"key".to_vec(), b"one".to_vec());

    assert!(chain.update_storage(item.clone()).is_err());
    chain.add_storage(item.clone()).unwrap();
    assert!(matches!(
        chain.add_storage(item.clone()),
        Err(LedgerError::AlreadyExists { .. })
    ));

    let mut updated = item;
    updated.value = b"two".to_vec();
    chain.update_storage(updated).unwrap();
    assert_eq!(chain.get_storage(&owner, b"key").unwrap().value, b"two");

    chain.delete_storage(&owner, b"key");
    assert!(chain.try_get_storage(&owner, b"key").is_none());
}

#[test]
fn test_contracts_accounts_and_validators() {
    let mut chain = MemoryBlockchain::default();
    let contract = Contract::new(vec![0x51, 0x66], Default::default());
    let hash = contract.hash;
    chain.add_contract(contract.clone()).unwrap();
    assert!(chain.add_contract(contract).is_err());
    assert!(chain.try_get_contract(&hash).is_some());
    chain.delete_contract(&hash);
    assert!(chain.try_get_contract(&hash).is_none());

    let mut account = Account::new(UInt160([9u8; 20]));
    account.is_frozen = true;
    chain.put_account(account.clone());
    assert!(chain.get_account(&account.hash).unwrap().is_frozen);
    chain.delete_account(&account.hash);
    assert!(chain.try_get_account(&account.hash).is_none());

    let key = test_public_key(3);
    chain.add_validator(Validator::new(key.clone())).unwrap();
    assert!(chain.add_validator(Validator::new(key.clone())).is_err());
    assert_eq!(chain.validators().len(), 1);
    assert!(chain.try_get_validator(&key).is_some());
}

#[test]
fn test_transaction_hashes_for_verifying() {
    let mut chain = MemoryBlockchain::default();
    let share = UInt256([5u8; 32]);
    let token = UInt256([6u8; 32]);
    chain.add_asset(test_asset(share, AssetType::Share)).unwrap();
    chain.add_asset(test_asset(token, AssetType::Token)).unwrap();

    let sender = UInt160([1u8; 20]);
    let funding = Transaction::contract(
        Vec::new(),
        vec![Output {
            asset: token,
            value: 1,
            address: sender,
        }],
    );
    let input = Input {
        prev_hash: funding.hash(),
        prev_index: 0,
    };
    chain.persist_block(Block::new(Header::default(), vec![funding]));

    let share_holder = UInt160([2u8; 20]);
    let token_holder = UInt160([3u8; 20]);
    let attribute_hash = UInt160([4u8; 20]);
    let tx = Transaction::contract(
        vec![input],
        vec![
            Output {
                asset: share,
                value: 1,
                address: share_holder,
            },
            Output {
                asset: token,
                value: 1,
                address: token_holder,
            },
        ],
    )
    .with_attribute(Attribute::new(
        AttributeUsage::SCRIPT,
        attribute_hash.to_array().to_vec(),
    ));

    let hashes = ScriptContainer::Transaction(tx)
        .script_hashes_for_verifying(&chain)
        .unwrap();
    assert!(hashes.contains(&sender));
    assert!(hashes.contains(&share_holder));
    assert!(hashes.contains(&attribute_hash));
    assert!(!hashes.contains(&token_holder));
}

#[test]
fn test_block_hashes_for_verifying() {
    let mut chain = MemoryBlockchain::default();
    let next_consensus = UInt160([8u8; 20]);
    let mut header = Header::default();
    header.next_consensus = next_consensus;
    chain.persist_block(Block::new(header, Vec::new()));

    let mut next = Block::default();
    next.header.index = 2;
    next.header.prev_hash = chain.current_block().hash();
    let hashes = ScriptContainer::Block(next)
        .script_hashes_for_verifying(&chain)
        .unwrap();
    assert_eq!(hashes.into_iter().collect::<Vec<_>>(), vec![next_consensus]);
}

#[test]
fn test_consensus_hashes_for_verifying() {
    let mut chain = MemoryBlockchain::default();
    let validator = test_public_key(4);
    chain.set_next_validators(vec![validator.clone()]);

    let payload = ConsensusPayload {
        prev_hash: chain.current_block().hash(),
        validator_index: 0,
        ..Default::default()
    };
    let hashes = ScriptContainer::Consensus(payload.clone())
        .script_hashes_for_verifying(&chain)
        .unwrap();
    assert!(hashes.contains(&verification_script_hash(&validator)));

    let stale = ConsensusPayload {
        prev_hash: UInt256([1u8; 32]),
        ..payload
    };
    assert!(matches!(
        ScriptContainer::Consensus(stale).script_hashes_for_verifying(&chain),
        Err(LedgerError::InvalidScriptContainer(_))
    ));
}
